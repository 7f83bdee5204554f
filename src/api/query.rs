// src/api/query.rs
//! Query construction for the MediaWiki action API.
//!
//! A query is an ordered parameter list plus an optional batch of titles.
//! Rendering percent-encodes every value and joins titles with a literal
//! `|`, the API's multi-value separator.

use super::types::Continuation;
use crate::constants::{CATEGORY_MEMBERS_PAGE_SIZE, THUMBNAIL_WIDTH};
use crate::types::{CategoryName, ItemTitle};

/// One logical API query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiQuery {
    params: Vec<(String, String)>,
    titles: Vec<ItemTitle>,
}

impl ApiQuery {
    /// A bare `action=query&format=xml` query.
    pub fn new() -> Self {
        Self {
            params: vec![
                ("action".to_string(), "query".to_string()),
                ("format".to_string(), "xml".to_string()),
            ],
            titles: Vec::new(),
        }
    }

    /// Adds a parameter; a flag takes an empty value.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn with_titles(mut self, titles: &[ItemTitle]) -> Self {
        self.titles.extend(titles.iter().cloned());
        self
    }

    /// Lists the members of a category, 500 at a time.
    pub fn category_members(category: &CategoryName) -> Self {
        Self::new()
            .with_param("list", "categorymembers")
            .with_param("cmlimit", CATEGORY_MEMBERS_PAGE_SIZE.to_string())
            .with_param("cmtitle", category.page_title())
    }

    /// Plain-text introduction of each page.
    pub fn extracts(titles: &[ItemTitle]) -> Self {
        Self::new()
            .with_param("prop", "extracts")
            .with_param("explaintext", "")
            .with_param("exintro", "")
            .with_param("exlimit", "max")
            .with_titles(titles)
    }

    /// Categories each page belongs to.
    pub fn page_categories(titles: &[ItemTitle]) -> Self {
        Self::new()
            .with_param("prop", "categories")
            .with_param("cllimit", "max")
            .with_titles(titles)
    }

    /// Daily page views over the last `days` days.
    pub fn page_views(titles: &[ItemTitle], days: u32) -> Self {
        Self::new()
            .with_param("prop", "pageviews")
            .with_param("pvipdays", days.to_string())
            .with_titles(titles)
    }

    /// Lead image thumbnail of each page.
    pub fn page_images(titles: &[ItemTitle]) -> Self {
        Self::new()
            .with_param("prop", "pageimages")
            .with_param("piprop", "thumbnail|name")
            .with_param("pithumbsize", THUMBNAIL_WIDTH.to_string())
            .with_param("pilimit", "max")
            .with_titles(titles)
    }

    /// The same logical query, resumed from a continuation.
    pub fn continued(&self, continuation: &Continuation) -> Self {
        let mut next = self.clone();
        for (key, value) in continuation.params() {
            next.params.retain(|(k, _)| k != key);
            next.params.push((key.clone(), value.clone()));
        }
        next
    }

    /// Value of a parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn titles(&self) -> &[ItemTitle] {
        &self.titles
    }

    /// Renders the query string, without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect();

        if !self.titles.is_empty() {
            let joined = self
                .titles
                .iter()
                .map(|t| encode_component(t.as_str()))
                .collect::<Vec<_>>()
                .join("|");
            parts.push(format!("titles={}", joined));
        }

        parts.join("&")
    }
}

impl Default for ApiQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent-encodes a query component, spaces as `%20`.
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
