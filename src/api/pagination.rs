// src/api/pagination.rs
//! Continuation-following pagination over one logical query.

use super::parser::parse_api_response;
use super::query::ApiQuery;
use super::types::{PaginatedResponse, PaginationResult};
use super::xml::XmlElement;
use super::WikiRepository;
use crate::error::AppError;
use std::collections::HashSet;

/// Fetches every page of `query`, concatenating what `parse_page` extracts.
///
/// Items are returned in page order and never deduplicated. A repeated
/// continuation token is treated as a malformed response.
pub async fn fetch_all_pages<T, F>(
    repository: &dyn WikiRepository,
    query: &ApiQuery,
    max_pages: Option<u32>,
    mut parse_page: F,
) -> Result<PaginationResult<T>, AppError>
where
    F: FnMut(&XmlElement) -> Result<PaginatedResponse<T>, AppError>,
{
    let mut all_items = Vec::new();
    let mut seen_tokens = HashSet::new();
    let mut next_query = query.clone();
    let mut pages_fetched = 0u32;

    loop {
        if let Some(max) = max_pages {
            if pages_fetched >= max {
                log::debug!("Reached maximum page limit: {}", max);
                break;
            }
        }

        let response = repository.query(&next_query).await?;
        let root = parse_api_response(&response)?;
        let page = parse_page(&root)?;

        all_items.extend(page.results);
        pages_fetched += 1;

        let Some(continuation) = page.continuation else {
            break;
        };

        let token = continuation.token();
        if !seen_tokens.insert(token.clone()) {
            return Err(AppError::ContinuationLoop { token });
        }
        log::debug!("Continuing query with {}", token);
        next_query = query.continued(&continuation);
    }

    Ok(PaginationResult {
        items: all_items,
        pages_fetched,
    })
}
