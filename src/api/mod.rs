// src/api/mod.rs
//! Wiki API interaction: the ability to query a MediaWiki endpoint.
//!
//! This module provides a data-oriented interface to the action API,
//! with clear separation between I/O operations, parsing, and business logic.

pub mod client;
pub mod pagination;
pub mod parser;
pub mod query;
pub mod throttle;
pub mod types;
pub mod xml;

use crate::error::AppError;

/// Result of an HTTP operation with response metadata.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

impl ApiResponse<String> {
    /// A successful response, as a fake repository would return it.
    pub fn ok(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            data: body.into(),
            status: reqwest::StatusCode::OK,
            url: url.into(),
        }
    }
}

/// The ability to query a wiki and fetch the binaries it links to.
///
/// This is the fundamental algebra for API interaction.
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait WikiRepository: Send + Sync {
    /// Issues one request for one page of a query.
    async fn query(&self, query: &query::ApiQuery) -> Result<ApiResponse<String>, AppError>;

    /// Fetches a binary resource by absolute URL.
    async fn download(&self, url: &str) -> Result<Vec<u8>, AppError>;
}

// Re-export the public interface
pub use client::WikiHttpClient;
pub use pagination::fetch_all_pages;
pub use query::ApiQuery;
pub use throttle::ThrottledRepository;
#[allow(unused_imports)] // Used by lib crate
pub use types::{CategoryMember, Continuation, MemberKind, PaginatedResponse, PaginationResult};
pub use xml::XmlElement;
