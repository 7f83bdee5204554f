// src/main.rs

// Modules defined in the crate
mod api;
mod config;
mod constants;
mod error;
mod harvest;
mod output;
mod pipeline;
mod storage;
mod types;

// Specific imports
use crate::config::{CommandLineInput, HarvestConfig};
use crate::error::AppError;
use crate::harvest::{CategoryClosure, HarvestOutcome, Harvester};
use crate::pipeline::{RecordComposer, RecordDelivery, TitleSource};
use crate::storage::SqliteStore;
use crate::types::{ItemTitle, TaxonomyTerm};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use std::fs;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let console_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let log_file_path = std::env::temp_dir().join("wikiharvest.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(console_level)))
                .build("stdout", Box::new(stdout_appender)),
        )
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        // Dependencies log every connection and statement at debug.
        .logger(Logger::builder().build("hyper", LevelFilter::Warn))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .logger(Logger::builder().build("sqlx", LevelFilter::Warn))
        .build(
            Root::builder()
                .appender("stdout")
                .appender("file")
                .build(LevelFilter::Debug),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Executes the three-stage harvest pipeline: discover → compose → deliver.
async fn execute_pipeline(config: &HarvestConfig) -> Result<(), AppError> {
    let pipeline = WikiHarvest::new(config)?;

    let closure = pipeline.discover(&config.term).await?;
    let outcome = pipeline.compose(&closure.titles()).await?;
    let rows = pipeline.deliver(&config.term, &outcome).await?;
    pipeline.report_completion(&closure, &outcome, rows);

    Ok(())
}

/// Orchestrates discovery, enrichment and storage of one category's items.
struct WikiHarvest<'a> {
    config: &'a HarvestConfig,
    harvester: Harvester,
}

impl<'a> WikiHarvest<'a> {
    fn new(config: &'a HarvestConfig) -> Result<Self, AppError> {
        let client = api::WikiHttpClient::new(config.api_url.clone(), config.timeout)?;
        let repository: Arc<dyn api::WikiRepository> = Arc::new(client);
        Ok(Self {
            config,
            harvester: Harvester::new(repository, config),
        })
    }

    /// Reports completion to the user with stats.
    fn report_completion(&self, closure: &CategoryClosure, outcome: &HarvestOutcome, rows: usize) {
        println!(
            "📚 Found {} items in {} categories (depth {}).",
            closure.items.len(),
            closure.visited.len(),
            closure.depth
        );
        println!(
            "🔎 Enriched them with {} batched requests.",
            outcome.batches
        );

        let images = &outcome.images;
        if self.config.skip_images {
            println!("🖼  Image downloads skipped.");
        } else if images.is_success() {
            println!(
                "🖼  Downloaded {} images ({} bytes) to {}.",
                images.written.len(),
                images.bytes_written,
                output::display_path(&self.config.images_dir)
            );
        } else {
            eprintln!(
                "⚠️  {} of {} images could not be downloaded; see the log for details.",
                images.failed.len(),
                images.attempted
            );
        }

        println!(
            "✓ Stored {} rows in table \"{}\" of {}",
            rows,
            self.config.term,
            self.config.database_path.display()
        );
    }
}

#[async_trait::async_trait]
impl TitleSource for WikiHarvest<'_> {
    async fn discover(&self, term: &TaxonomyTerm) -> Result<CategoryClosure, AppError> {
        log::info!("Expanding categories under '{}':", term);
        let closure = self.harvester.expand(&term.as_category()).await?;
        log::info!(
            "Found {} unique items across {} categories",
            closure.items.len(),
            closure.visited.len()
        );
        Ok(closure)
    }
}

#[async_trait::async_trait]
impl RecordComposer for WikiHarvest<'_> {
    async fn compose(&self, titles: &[ItemTitle]) -> Result<HarvestOutcome, AppError> {
        self.harvester.compose(titles).await
    }
}

#[async_trait::async_trait]
impl RecordDelivery for WikiHarvest<'_> {
    async fn deliver(
        &self,
        term: &TaxonomyTerm,
        outcome: &HarvestOutcome,
    ) -> Result<usize, AppError> {
        let store = SqliteStore::connect(&self.config.database_path).await?;
        store.replace_collection(term, &outcome.records).await
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = HarvestConfig::resolve(cli)?;

    if let Err(e) = execute_pipeline(&config).await {
        log::error!("Harvest failed: {}", e);
        if e.is_transient() {
            log::error!("The wiki reported a temporary condition; rerunning later may succeed.");
        }
        return Err(e.into());
    }

    Ok(())
}
