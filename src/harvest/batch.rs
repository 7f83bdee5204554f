// src/harvest/batch.rs
//! Batched attribute enrichment.
//!
//! Titles are split into fixed-size batches; each batch becomes one query
//! (followed through any continuation pages), and every returned page is
//! folded into a partial map. Partial maps are merged once their batches
//! complete, then every requested title that is still missing receives
//! the attribute's default.

use crate::api::parser::{parse_continuation, parse_normalized_titles, parse_pages};
use crate::api::{fetch_all_pages, ApiQuery, PaginatedResponse, WikiRepository, XmlElement};
use crate::error::AppError;
use crate::types::ItemTitle;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// One attribute the enricher knows how to fetch and extract.
pub trait AttributeFetcher: Sync {
    /// The per-title value; `Default` is what absent titles receive.
    type Value: Default + Clone + Send + fmt::Debug;

    /// Name used in logs and error messages.
    fn attribute(&self) -> &'static str;

    /// The query for one batch of titles.
    fn build_query(&self, batch: &[ItemTitle]) -> ApiQuery;

    /// The value carried by one `<page>` element, or `None` when the page
    /// says nothing about this attribute.
    fn extract(&self, page: &XmlElement) -> Option<Self::Value>;

    /// Merges a value for a title already seen on an earlier
    /// continuation page. Replaces by default.
    fn combine(&self, existing: &mut Self::Value, incoming: Self::Value) {
        *existing = incoming;
    }
}

/// Title → value, one entry per requested title once a pass completes.
#[derive(Debug, Clone)]
pub struct AttributeMap<V> {
    values: HashMap<ItemTitle, V>,
}

impl<V> Default for AttributeMap<V> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<V> AttributeMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, title: &ItemTitle) -> Option<&V> {
        self.values.get(title)
    }

    pub fn insert(&mut self, title: ItemTitle, value: V) -> Option<V> {
        self.values.insert(title, value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Absorbs a partial map from a disjoint batch.
    fn merge(mut self, other: Self) -> Self {
        self.values.extend(other.values);
        self
    }
}

impl<V: Default> AttributeMap<V> {
    /// Gives every title without an entry the default value.
    pub fn fill_defaults(&mut self, titles: &[ItemTitle]) -> usize {
        let mut filled = 0;
        for title in titles {
            self.values.entry(title.clone()).or_insert_with(|| {
                filled += 1;
                V::default()
            });
        }
        filled
    }
}

/// A completed enrichment pass.
#[derive(Debug, Clone)]
pub struct EnrichmentPass<V> {
    pub values: AttributeMap<V>,
    /// Batches issued; `ceil(titles / batch_size)`.
    pub batches: usize,
    /// Titles that received the default because the response said nothing.
    pub defaulted: usize,
}

/// Runs attribute fetchers over a title list in fixed-size batches.
pub struct BatchEnricher<'a> {
    repository: &'a dyn WikiRepository,
    batch_size: usize,
    concurrency: usize,
}

impl<'a> BatchEnricher<'a> {
    pub fn new(repository: &'a dyn WikiRepository, batch_size: usize, concurrency: usize) -> Self {
        Self {
            repository,
            batch_size: batch_size.max(1),
            concurrency: concurrency.max(1),
        }
    }

    /// Fetches one attribute for every title.
    ///
    /// Any failed batch fails the whole pass.
    pub async fn enrich<A: AttributeFetcher>(
        &self,
        titles: &[ItemTitle],
        fetcher: &A,
    ) -> Result<EnrichmentPass<A::Value>, AppError> {
        let batches: Vec<&[ItemTitle]> = titles.chunks(self.batch_size).collect();
        let batch_count = batches.len();
        let total = titles.len();

        log::info!(
            "Fetching {} for {} titles in {} batch(es)",
            fetcher.attribute(),
            total,
            batch_count
        );

        // Built up front so the stream holds plain futures, not a borrowing closure.
        let pending: Vec<_> = batches
            .into_iter()
            .map(|batch| self.enrich_batch(batch, fetcher))
            .collect();

        let mut completed = 0usize;
        let mut values = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .try_fold(AttributeMap::new(), |acc, partial| {
                completed += partial.1;
                log::info!("{}: {} / {}", fetcher.attribute(), completed, total);
                futures::future::ready(Ok(acc.merge(partial.0)))
            })
            .await?;

        let defaulted = values.fill_defaults(titles);
        if defaulted > 0 {
            log::debug!(
                "{}: {} title(s) had no value and received the default",
                fetcher.attribute(),
                defaulted
            );
        }

        Ok(EnrichmentPass {
            values,
            batches: batch_count,
            defaulted,
        })
    }

    /// Fetches one batch, returning its partial map and batch length.
    async fn enrich_batch<A: AttributeFetcher>(
        &self,
        batch: &[ItemTitle],
        fetcher: &A,
    ) -> Result<(AttributeMap<A::Value>, usize), AppError> {
        let query = fetcher.build_query(batch);
        let requested: HashSet<&str> = batch.iter().map(ItemTitle::as_str).collect();

        let result = fetch_all_pages(self.repository, &query, None, |root| {
            Ok(PaginatedResponse {
                results: extract_page_values(root, fetcher, &requested),
                continuation: parse_continuation(root),
            })
        })
        .await?;

        let mut partial = AttributeMap::new();
        for (title, value) in result.items {
            match partial.values.get_mut(&title) {
                Some(existing) => fetcher.combine(existing, value),
                None => {
                    partial.insert(title, value);
                }
            }
        }

        Ok((partial, batch.len()))
    }
}

/// Extracts `(requested title, value)` pairs from one response page.
fn extract_page_values<A: AttributeFetcher>(
    root: &XmlElement,
    fetcher: &A,
    requested: &HashSet<&str>,
) -> Vec<(ItemTitle, A::Value)> {
    let normalized = parse_normalized_titles(root);

    parse_pages(root)
        .into_iter()
        .filter_map(|page| {
            let Some(returned) = page.attr("title") else {
                log::warn!("{}: skipping a page without a title", fetcher.attribute());
                return None;
            };
            let title = normalized
                .get(returned)
                .map(String::as_str)
                .unwrap_or(returned);
            if !requested.contains(title) {
                log::debug!(
                    "{}: ignoring '{}', which was not requested",
                    fetcher.attribute(),
                    title
                );
                return None;
            }
            let value = fetcher.extract(page)?;
            Some((ItemTitle::new(title), value))
        })
        .collect()
}
