// src/harvest/assembler.rs
//! Joins per-attribute maps into complete records.

use super::batch::AttributeMap;
use super::images::ImageReference;
use crate::error::AppError;
use crate::types::{CategoryName, ItemTitle};

/// One harvested item, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: ItemTitle,
    pub summary: String,
    pub view_count: u64,
    /// Local image path, empty when the item has no image
    pub image_path: String,
    pub categories: Vec<CategoryName>,
    pub url: String,
}

/// Builds one record per title, in title order.
///
/// Every map must hold every title; a gap means an enrichment pass skipped
/// its default-fill and is reported as [`AppError::IncompleteEnrichment`].
pub fn assemble<F>(
    titles: &[ItemTitle],
    summaries: &AttributeMap<String>,
    views: &AttributeMap<u64>,
    categories: &AttributeMap<Vec<CategoryName>>,
    images: &AttributeMap<Option<ImageReference>>,
    url_fn: F,
) -> Result<Vec<Record>, AppError>
where
    F: Fn(&ItemTitle) -> String,
{
    titles
        .iter()
        .map(|title| {
            Ok(Record {
                title: title.clone(),
                summary: lookup(summaries, "summary", title)?.clone(),
                view_count: *lookup(views, "view count", title)?,
                image_path: lookup(images, "image", title)?
                    .as_ref()
                    .map(ImageReference::stored_path)
                    .unwrap_or_default(),
                categories: lookup(categories, "categories", title)?.clone(),
                url: url_fn(title),
            })
        })
        .collect()
}

fn lookup<'m, V>(
    map: &'m AttributeMap<V>,
    attribute: &'static str,
    title: &ItemTitle,
) -> Result<&'m V, AppError> {
    map.get(title).ok_or_else(|| AppError::IncompleteEnrichment {
        attribute,
        title: title.to_string(),
    })
}
