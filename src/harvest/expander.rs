// src/harvest/expander.rs
//! Category closure: every item reachable from a root category.
//!
//! The closure is computed one frontier at a time. Member listings of a
//! frontier are fetched concurrently, then folded in frontier order; the
//! visited set is only touched during that fold, so each category is
//! claimed exactly once and the result is stable for a given graph.

use crate::api::{fetch_all_pages, ApiQuery, CategoryMember, MemberKind, WikiRepository};
use crate::api::parser::parse_category_members;
use crate::error::AppError;
use crate::types::{CategoryName, ItemTitle};
use futures::stream::{self, StreamExt, TryStreamExt};
use indexmap::IndexSet;
use std::collections::HashSet;

/// Categories already claimed by the current traversal.
///
/// # Laws
///
/// - **Idempotency**: visiting the same name twice returns `false` the second time.
/// - **Persistence**: once visited, a name stays visited.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    categories: HashSet<CategoryName>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a category visited; returns whether this was the first visit.
    pub fn visit(&mut self, name: &CategoryName) -> bool {
        self.categories.insert(name.clone())
    }

    pub fn contains(&self, name: &CategoryName) -> bool {
        self.categories.contains(name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

/// The outcome of expanding a root category.
#[derive(Debug, Clone)]
pub struct CategoryClosure {
    /// Leaf items in discovery order, each exactly once.
    pub items: IndexSet<ItemTitle>,
    /// Every category expanded, the root included.
    pub visited: VisitedSet,
    /// Frontiers walked; the root alone is depth 1.
    pub depth: usize,
}

impl CategoryClosure {
    /// Items as an ordered vector, ready for batching.
    pub fn titles(&self) -> Vec<ItemTitle> {
        self.items.iter().cloned().collect()
    }
}

/// Expands categories through a wiki repository.
pub struct CategoryExpander<'a> {
    repository: &'a dyn WikiRepository,
    concurrency: usize,
}

impl<'a> CategoryExpander<'a> {
    pub fn new(repository: &'a dyn WikiRepository, concurrency: usize) -> Self {
        Self {
            repository,
            concurrency: concurrency.max(1),
        }
    }

    /// Computes the closure of `root`.
    pub async fn expand(&self, root: &CategoryName) -> Result<CategoryClosure, AppError> {
        let mut visited = VisitedSet::new();
        let mut items = IndexSet::new();
        let mut depth = 0;

        visited.visit(root);
        let mut frontier = vec![root.clone()];

        while !frontier.is_empty() {
            depth += 1;
            log::info!(
                "Expanding {} categor{} at depth {}",
                frontier.len(),
                if frontier.len() == 1 { "y" } else { "ies" },
                depth
            );

            let pending: Vec<_> = frontier
                .into_iter()
                .map(|category| async move {
                    let members = self.list_members(&category).await?;
                    Ok::<_, AppError>((category, members))
                })
                .collect();
            let listings: Vec<(CategoryName, Vec<CategoryMember>)> = stream::iter(pending)
                .buffered(self.concurrency)
                .try_collect()
                .await?;

            let mut next = Vec::new();
            for (category, members) in listings {
                fold_members(&category, members, &mut visited, &mut items, &mut next);
            }
            frontier = next;
        }

        log::info!(
            "Category closure complete: {} items across {} categories",
            items.len(),
            visited.len()
        );

        Ok(CategoryClosure {
            items,
            visited,
            depth,
        })
    }

    /// All members of one category, every page concatenated.
    pub async fn list_members(
        &self,
        category: &CategoryName,
    ) -> Result<Vec<CategoryMember>, AppError> {
        let query = ApiQuery::category_members(category);
        let result = fetch_all_pages(self.repository, &query, None, parse_category_members).await?;
        log::debug!(
            "Category '{}': {} members over {} page(s)",
            category,
            result.items.len(),
            result.pages_fetched
        );
        Ok(result.items)
    }
}

/// Folds one category's members into the traversal state.
fn fold_members(
    category: &CategoryName,
    members: Vec<CategoryMember>,
    visited: &mut VisitedSet,
    items: &mut IndexSet<ItemTitle>,
    next: &mut Vec<CategoryName>,
) {
    for member in members {
        match member.kind() {
            MemberKind::SubCategory(name) => {
                if visited.visit(&name) {
                    log::info!("\t- {}", name);
                    next.push(name);
                } else {
                    log::debug!("Skipping '{}' under '{}': already visited", name, category);
                }
            }
            MemberKind::Item(title) => {
                items.insert(title);
            }
            MemberKind::Ignored => {
                log::trace!("Ignoring '{}' in '{}'", member.title, category);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visited_set_laws() {
        let mut visited = VisitedSet::new();
        let a = CategoryName::new("A");
        assert!(visited.visit(&a));
        assert!(!visited.visit(&a));
        assert!(visited.contains(&a));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_fold_members_dedups_and_claims() {
        let mut visited = VisitedSet::new();
        let mut items = IndexSet::new();
        let mut next = Vec::new();
        let root = CategoryName::new("X");
        visited.visit(&root);

        let members = vec![
            CategoryMember::new("Category:Y", Some(14)),
            CategoryMember::new("Category:X", Some(14)),
            CategoryMember::new("P1", Some(0)),
            CategoryMember::new("P1", Some(0)),
            CategoryMember::new("File:P1.png", Some(6)),
        ];
        fold_members(&root, members, &mut visited, &mut items, &mut next);

        assert_eq!(next, vec![CategoryName::new("Y")]);
        assert_eq!(items.len(), 1);
        assert_eq!(visited.len(), 2);
    }
}
