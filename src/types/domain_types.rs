// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::CATEGORY_PREFIX;
use serde::Serialize;
use std::fmt;
use url::Url;

/// The taxonomy term a harvest starts from.
///
/// Names both the root category and the table the records land in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxonomyTerm(String);

impl TaxonomyTerm {
    /// Create a new term, trimming whitespace and any leading `Category:`.
    pub fn new(term: impl Into<String>) -> Result<Self, ValidationError> {
        let term = term.into();
        let trimmed = term.trim();
        let bare = trimmed
            .strip_prefix(CATEGORY_PREFIX)
            .unwrap_or(trimmed)
            .trim();

        if bare.is_empty() {
            return Err(ValidationError::EmptyField("term"));
        }

        if bare.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidTerm {
                term: term.clone(),
                reason: "contains control characters".to_string(),
            });
        }

        Ok(Self(bare.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root category this term names.
    pub fn as_category(&self) -> CategoryName {
        CategoryName::new(self.0.clone())
    }
}

impl fmt::Display for TaxonomyTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category name without its `Category:` namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Strips the `Category:` prefix if present.
    pub fn from_prefixed(title: &str) -> Self {
        Self(title.strip_prefix(CATEGORY_PREFIX).unwrap_or(title).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The full page title, as the API expects it in `cmtitle`.
    pub fn page_title(&self) -> String {
        format!("{}{}", CATEGORY_PREFIX, self.0)
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Title of a leaf content item (an article).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemTitle(String);

impl ItemTitle {
    pub fn new(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The title as it appears in article URLs: spaces become underscores.
    pub fn url_form(&self) -> String {
        self.0.replace(' ', "_")
    }
}

impl fmt::Display for ItemTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemTitle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for ItemTitle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Validated URL type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl ValidatedUrl {
    /// Create a new validated URL
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        match Url::parse(url) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: url.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
