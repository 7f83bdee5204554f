// src/harvest/mod.rs
//! The harvest: category closure, batched enrichment, record assembly.
//!
//! [`Harvester`] drives the stages against any [`WikiRepository`]; the
//! stages themselves live in the submodules and can be used on their own.

pub mod assembler;
pub mod attributes;
pub mod batch;
pub mod expander;
pub mod images;

use crate::api::{ThrottledRepository, WikiRepository};
use crate::config::HarvestConfig;
use crate::error::AppError;
use crate::output::{self, MaterializeReport};
use crate::types::{CategoryName, ItemTitle};
use indexmap::IndexSet;
use std::sync::Arc;

pub use assembler::{assemble, Record};
pub use attributes::{CategoryListFetcher, PageImageFetcher, PageViewFetcher, SummaryFetcher};
#[allow(unused_imports)] // Used by lib crate
pub use batch::{AttributeFetcher, AttributeMap, BatchEnricher, EnrichmentPass};
#[allow(unused_imports)] // Used by lib crate
pub use expander::{CategoryClosure, CategoryExpander, VisitedSet};
pub use images::{ImageMaterializer, ImageReference};

/// All four attribute maps for one title set.
#[derive(Debug, Clone)]
pub struct Enrichment {
    pub summaries: EnrichmentPass<String>,
    pub views: EnrichmentPass<u64>,
    pub categories: EnrichmentPass<Vec<CategoryName>>,
    pub images: EnrichmentPass<Option<ImageReference>>,
}

impl Enrichment {
    /// Distinct image references in title order, for the materializer.
    ///
    /// Articles sharing a lead image share its file, so each source URL
    /// is downloaded once.
    pub fn image_references(&self, titles: &[ItemTitle]) -> Vec<ImageReference> {
        let mut seen = IndexSet::new();
        titles
            .iter()
            .filter_map(|t| self.images.values.get(t).cloned().flatten())
            .filter(|reference| seen.insert(reference.source_url.clone()))
            .collect()
    }

    pub fn batches(&self) -> usize {
        self.summaries.batches + self.views.batches + self.categories.batches + self.images.batches
    }
}

/// Records plus what it took to produce them.
#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub records: Vec<Record>,
    pub images: MaterializeReport,
    pub batches: usize,
}

/// Runs the harvest stages with one repository and one configuration.
///
/// Every request goes through a single [`ThrottledRepository`], so
/// `config.concurrency` bounds requests in flight across all stages.
pub struct Harvester {
    repository: Arc<ThrottledRepository>,
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(repository: Arc<dyn WikiRepository>, config: &HarvestConfig) -> Self {
        let repository = ThrottledRepository::new(repository, config.concurrency);
        log::debug!("At most {} request(s) in flight", repository.limit());
        Self {
            repository: Arc::new(repository),
            config: config.clone(),
        }
    }

    /// Expands the root category into its item closure.
    pub async fn expand(&self, root: &CategoryName) -> Result<CategoryClosure, AppError> {
        CategoryExpander::new(&*self.repository, self.config.concurrency)
            .expand(root)
            .await
    }

    /// Runs the four attribute passes concurrently.
    pub async fn enrich(&self, titles: &[ItemTitle]) -> Result<Enrichment, AppError> {
        let enricher = BatchEnricher::new(
            &*self.repository,
            self.config.batch_size,
            self.config.concurrency,
        );
        let summaries = SummaryFetcher;
        let views = PageViewFetcher {
            days: self.config.pageview_days,
        };
        let categories = CategoryListFetcher;
        let images = PageImageFetcher {
            images_dir: self.config.images_dir.clone(),
        };

        let (summaries, views, categories, images) = tokio::try_join!(
            enricher.enrich(titles, &summaries),
            enricher.enrich(titles, &views),
            enricher.enrich(titles, &categories),
            enricher.enrich(titles, &images),
        )?;

        Ok(Enrichment {
            summaries,
            views,
            categories,
            images,
        })
    }

    /// Downloads every referenced image unless image downloads are disabled.
    pub async fn materialize_images(
        &self,
        references: &[ImageReference],
    ) -> Result<MaterializeReport, AppError> {
        if self.config.skip_images {
            log::info!("Skipping {} image download(s)", references.len());
            return Ok(MaterializeReport::default());
        }
        output::create_directory(&self.config.images_dir).await?;
        Ok(ImageMaterializer::new(&*self.repository, self.config.concurrency)
            .materialize(references)
            .await)
    }

    /// Enriches, downloads images and assembles records for `titles`.
    pub async fn compose(&self, titles: &[ItemTitle]) -> Result<HarvestOutcome, AppError> {
        let enrichment = self.enrich(titles).await?;
        let images = self
            .materialize_images(&enrichment.image_references(titles))
            .await?;

        let wiki_url = self.config.wiki_url.as_str();
        let records = assemble(
            titles,
            &enrichment.summaries.values,
            &enrichment.views.values,
            &enrichment.categories.values,
            &enrichment.images.values,
            |title| output::article_url(wiki_url, title),
        )?;

        Ok(HarvestOutcome {
            records,
            images,
            batches: enrichment.batches(),
        })
    }
}
