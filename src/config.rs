// src/config.rs
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DATABASE_PATH, DEFAULT_IMAGES_DIR, DEFAULT_PAGEVIEW_DAYS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TERM, MAX_BATCH_SIZE, MAX_CONCURRENCY,
    MAX_PAGEVIEW_DAYS, WIKI_API_URL, WIKI_ARTICLE_URL,
};
use crate::error::AppError;
use crate::types::{TaxonomyTerm, ValidatedUrl, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Category to harvest, with or without the "Category:" prefix
    #[arg(default_value = DEFAULT_TERM)]
    pub term: String,

    /// SQLite database file receiving the harvested table
    #[arg(short = 'o', long, default_value = DEFAULT_DATABASE_PATH)]
    pub database: String,

    /// Directory receiving downloaded images
    #[arg(long, default_value = DEFAULT_IMAGES_DIR)]
    pub images_dir: String,

    /// Record image paths but download nothing
    #[arg(long, default_value_t = false)]
    pub skip_images: bool,

    /// Titles per enrichment request (1-50)
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Number of concurrent requests (default: auto, max 32)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Days of page-view history to sum (1-60)
    #[arg(long, default_value_t = DEFAULT_PAGEVIEW_DAYS)]
    pub pageview_days: u32,

    /// MediaWiki api.php endpoint
    #[arg(long, default_value = WIKI_API_URL)]
    pub api_url: String,

    /// Article base URL; record URLs are this plus the title
    #[arg(long, default_value = WIKI_ARTICLE_URL)]
    pub wiki_url: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Resolved harvest configuration, validated and ready to drive all three stages.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub term: TaxonomyTerm,
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
    pub skip_images: bool,
    pub batch_size: usize,
    /// Already resolved; never zero
    pub concurrency: usize,
    pub timeout: Duration,
    pub pageview_days: u32,
    pub api_url: ValidatedUrl,
    /// Always ends with '/'
    pub wiki_url: ValidatedUrl,
    #[allow(dead_code)] // Used by bin crate
    pub verbose: bool,
}

impl HarvestConfig {
    /// Resolves a complete configuration from CLI input.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let term = TaxonomyTerm::new(cli.term)?;
        let batch_size = within(cli.batch_size as u64, 1, MAX_BATCH_SIZE as u64)? as usize;
        let pageview_days =
            within(u64::from(cli.pageview_days), 1, u64::from(MAX_PAGEVIEW_DAYS))? as u32;
        let timeout_secs = within(cli.timeout, 1, 3600)?;
        let concurrency = match cli.concurrency {
            Some(requested) => within(requested as u64, 1, MAX_CONCURRENCY as u64)? as usize,
            None => default_concurrency(),
        };

        Ok(HarvestConfig {
            term,
            database_path: PathBuf::from(cli.database),
            images_dir: PathBuf::from(cli.images_dir),
            skip_images: cli.skip_images,
            batch_size,
            concurrency,
            timeout: Duration::from_secs(timeout_secs),
            pageview_days,
            api_url: ValidatedUrl::parse(&cli.api_url)?,
            wiki_url: article_base(&cli.wiki_url)?,
            verbose: cli.verbose,
        })
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            term: TaxonomyTerm::new(DEFAULT_TERM).expect("Default term should be valid"),
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            skip_images: false,
            batch_size: DEFAULT_BATCH_SIZE,
            concurrency: default_concurrency(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            pageview_days: DEFAULT_PAGEVIEW_DAYS,
            api_url: ValidatedUrl::parse(WIKI_API_URL).expect("Default API URL should be valid"),
            wiki_url: ValidatedUrl::parse(WIKI_ARTICLE_URL)
                .expect("Default article URL should be valid"),
            verbose: false,
        }
    }
}

/// One worker per core, clamped to 2..=8.
pub fn default_concurrency() -> usize {
    num_cpus::get().clamp(2, 8)
}

fn within(value: u64, min: u64, max: u64) -> Result<u64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::OutOfBounds { value, min, max })
    }
}

fn article_base(url: &str) -> Result<ValidatedUrl, ValidationError> {
    if url.ends_with('/') {
        ValidatedUrl::parse(url)
    } else {
        ValidatedUrl::parse(&format!("{}/", url))
    }
}
