// src/harvest/attributes.rs
//! The four attributes every harvested item is enriched with.

use super::batch::AttributeFetcher;
use super::images::ImageReference;
use crate::api::{ApiQuery, XmlElement};
use crate::types::{CategoryName, ItemTitle};
use std::path::PathBuf;

/// Plain-text introduction of each article.
#[derive(Debug, Clone, Default)]
pub struct SummaryFetcher;

impl AttributeFetcher for SummaryFetcher {
    type Value = String;

    fn attribute(&self) -> &'static str {
        "summaries"
    }

    fn build_query(&self, batch: &[ItemTitle]) -> ApiQuery {
        ApiQuery::extracts(batch)
    }

    fn extract(&self, page: &XmlElement) -> Option<String> {
        page.find("extract").map(|e| e.text().to_string())
    }
}

/// Total page views over the configured window.
#[derive(Debug, Clone)]
pub struct PageViewFetcher {
    pub days: u32,
}

impl AttributeFetcher for PageViewFetcher {
    type Value = u64;

    fn attribute(&self) -> &'static str {
        "page views"
    }

    fn build_query(&self, batch: &[ItemTitle]) -> ApiQuery {
        ApiQuery::page_views(batch, self.days)
    }

    fn extract(&self, page: &XmlElement) -> Option<u64> {
        let views = page.find("pageviews")?;
        Some(sum_daily_views(views))
    }
}

/// Sums `<pvip>` values; a day without data counts as zero.
pub fn sum_daily_views(pageviews: &XmlElement) -> u64 {
    pageviews
        .children_named("pvip")
        .map(|day| {
            let text = day.text().trim();
            if text.is_empty() {
                return 0;
            }
            text.parse::<u64>().unwrap_or_else(|_| {
                log::warn!(
                    "Unreadable view count '{}' for {}; counting it as zero",
                    text,
                    day.attr("date").unwrap_or("unknown date")
                );
                0
            })
        })
        .sum()
}

/// Categories each article belongs to, without the namespace prefix.
#[derive(Debug, Clone, Default)]
pub struct CategoryListFetcher;

impl AttributeFetcher for CategoryListFetcher {
    type Value = Vec<CategoryName>;

    fn attribute(&self) -> &'static str {
        "categories"
    }

    fn build_query(&self, batch: &[ItemTitle]) -> ApiQuery {
        ApiQuery::page_categories(batch)
    }

    fn extract(&self, page: &XmlElement) -> Option<Vec<CategoryName>> {
        let list = page.find("categories")?;
        Some(
            list.children_named("cl")
                .filter_map(|cl| cl.attr("title"))
                .map(CategoryName::from_prefixed)
                .collect(),
        )
    }

    // Long category lists arrive split across continuation pages.
    fn combine(&self, existing: &mut Vec<CategoryName>, incoming: Vec<CategoryName>) {
        for category in incoming {
            if !existing.contains(&category) {
                existing.push(category);
            }
        }
    }
}

/// Lead image of each article, as a reference to download later.
#[derive(Debug, Clone)]
pub struct PageImageFetcher {
    pub images_dir: PathBuf,
}

impl AttributeFetcher for PageImageFetcher {
    type Value = Option<ImageReference>;

    fn attribute(&self) -> &'static str {
        "images"
    }

    fn build_query(&self, batch: &[ItemTitle]) -> ApiQuery {
        ApiQuery::page_images(batch)
    }

    fn extract(&self, page: &XmlElement) -> Option<Option<ImageReference>> {
        let source = page.find("thumbnail")?.attr("source")?;
        Some(Some(ImageReference::new(source, &self.images_dir)))
    }
}
