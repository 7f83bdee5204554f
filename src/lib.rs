// src/lib.rs
//! wikiharvest library: harvests a wiki category closure into SQLite.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`, `WikiErrorCode`
//! - **Configuration**: `HarvestConfig`, `CommandLineInput`
//! - **Domain types**: `TaxonomyTerm`, `CategoryName`, `ItemTitle`, `ValidatedUrl`
//! - **API client**: `WikiRepository`, `WikiHttpClient`, `fetch_all_pages`, parsers
//! - **Harvest**: `CategoryExpander`, `BatchEnricher`, the attribute fetchers, `assemble`
//! - **Output and storage**: `ImageMaterializer`, filename derivation, `SqliteStore`

mod api;
mod config;
mod constants;
mod error;
mod harvest;
mod output;
mod pipeline;
mod storage;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Result, WikiErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{default_concurrency, CommandLineInput, HarvestConfig};

// --- Domain Types ---
pub use crate::types::{CategoryName, ItemTitle, TaxonomyTerm, ValidatedUrl};

// --- API Client ---
pub use crate::api::{
    parser::{
        parse_api_response, parse_category_members, parse_continuation, parse_normalized_titles,
        parse_pages,
    },
    ApiQuery, ApiResponse, CategoryMember, Continuation, MemberKind, PaginatedResponse,
    PaginationResult, ThrottledRepository, WikiHttpClient, WikiRepository, XmlElement,
};
pub use crate::api::fetch_all_pages;

// --- Harvest ---
pub use crate::harvest::{
    assemble, attributes::sum_daily_views, AttributeFetcher, AttributeMap, BatchEnricher,
    CategoryClosure, CategoryExpander, CategoryListFetcher, Enrichment, EnrichmentPass,
    HarvestOutcome, Harvester, ImageMaterializer, ImageReference, PageImageFetcher,
    PageViewFetcher, Record, SummaryFetcher, VisitedSet,
};

// --- Output ---
pub use crate::output::{
    article_url, image_filename, image_path, truncate_filename, FailedImage, MaterializeReport,
    WrittenImage,
};

// --- Storage ---
pub use crate::storage::SqliteStore;

// --- Pipeline Traits ---
pub use crate::pipeline::{RecordComposer, RecordDelivery, TitleSource};
