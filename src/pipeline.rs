// src/pipeline.rs
//! Pipeline capability traits: the three stages of a harvest.
//!
//! Each trait describes a single capability, enabling testing each stage in isolation.

use crate::error::AppError;
use crate::harvest::{CategoryClosure, HarvestOutcome};
use crate::types::{ItemTitle, TaxonomyTerm};

/// Discovers the item titles under a taxonomy term.
#[async_trait::async_trait]
pub trait TitleSource {
    async fn discover(&self, term: &TaxonomyTerm) -> Result<CategoryClosure, AppError>;
}

/// Turns item titles into complete records.
#[async_trait::async_trait]
pub trait RecordComposer {
    async fn compose(&self, titles: &[ItemTitle]) -> Result<HarvestOutcome, AppError>;
}

/// Hands finished records to their sink; returns the number of rows written.
#[async_trait::async_trait]
pub trait RecordDelivery {
    async fn deliver(&self, term: &TaxonomyTerm, outcome: &HarvestOutcome)
        -> Result<usize, AppError>;
}
