// src/api/types.rs
//! Type definitions for the wiki API module.
//!
//! This module defines immutable types for API operations,
//! following data-oriented design principles.

use crate::constants::{ARTICLE_NAMESPACE, CATEGORY_PREFIX};
use crate::types::{CategoryName, ItemTitle};

// --- Continuation ---

/// Opaque continuation parameters returned by a paginated query.
///
/// Every attribute of the `<continue>` node is echoed back verbatim on the
/// next request of the same logical query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Continuation {
    params: Vec<(String, String)>,
}

impl Continuation {
    pub fn new(params: Vec<(String, String)>) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// A stable rendering used to detect a server repeating itself.
    pub fn token(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

// --- Pagination Types ---

/// One page of a paginated response.
#[derive(Debug, Clone)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    pub continuation: Option<Continuation>,
}

/// Result of a pagination operation.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}

// --- Category membership ---

/// A member of a category as listed by `list=categorymembers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMember {
    pub title: String,
    pub namespace: Option<i32>,
}

/// What a category member is, as far as the traversal is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    SubCategory(CategoryName),
    Item(ItemTitle),
    /// Files, templates, talk pages and anything else
    Ignored,
}

impl CategoryMember {
    pub fn new(title: impl Into<String>, namespace: Option<i32>) -> Self {
        Self {
            title: title.into(),
            namespace,
        }
    }

    /// Classifies by title prefix first, then by namespace id.
    pub fn kind(&self) -> MemberKind {
        if let Some(name) = self.title.strip_prefix(CATEGORY_PREFIX) {
            return MemberKind::SubCategory(CategoryName::new(name));
        }
        match self.namespace {
            Some(ARTICLE_NAMESPACE) => MemberKind::Item(ItemTitle::new(self.title.clone())),
            _ => MemberKind::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_classification() {
        assert_eq!(
            CategoryMember::new("Category:Y", Some(14)).kind(),
            MemberKind::SubCategory(CategoryName::new("Y"))
        );
        assert_eq!(
            CategoryMember::new("P1", Some(0)).kind(),
            MemberKind::Item(ItemTitle::new("P1"))
        );
        assert_eq!(
            CategoryMember::new("Template:T1", Some(10)).kind(),
            MemberKind::Ignored
        );
        assert_eq!(CategoryMember::new("P3", None).kind(), MemberKind::Ignored);
    }

    #[test]
    fn test_continuation_token_is_stable() {
        let c = Continuation::new(vec![
            ("cmcontinue".to_string(), "page|4142|123".to_string()),
            ("continue".to_string(), "-||".to_string()),
        ]);
        assert_eq!(c.token(), "cmcontinue=page|4142|123&continue=-||");
        assert_eq!(c.params().len(), 2);
    }
}
