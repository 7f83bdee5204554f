// src/output/paths.rs
//! Pure functions for path calculations and filename generation.
//!
//! This module handles all path-related operations without
//! performing any I/O operations.

use crate::constants::{
    MAX_IMAGE_FILENAME_CHARS, TRUNCATED_FILENAME_PREFIX_CHARS, TRUNCATED_FILENAME_SUFFIX_CHARS,
};
use crate::types::ItemTitle;
use std::path::{Path, PathBuf};

/// The local filename for an image URL: its final path segment.
///
/// Names longer than the filesystem-safe bound keep a short prefix and
/// their last four characters, which preserves a typical extension.
pub fn image_filename(source_url: &str) -> String {
    let without_query = source_url
        .split(['?', '#'])
        .next()
        .unwrap_or(source_url);
    let name = without_query.rsplit('/').next().unwrap_or(without_query);
    truncate_filename(name)
}

/// Shortens names over the bound to prefix + suffix.
pub fn truncate_filename(name: &str) -> String {
    let length = name.chars().count();
    if length <= MAX_IMAGE_FILENAME_CHARS {
        return name.to_string();
    }

    let prefix: String = name.chars().take(TRUNCATED_FILENAME_PREFIX_CHARS).collect();
    let suffix: String = name
        .chars()
        .skip(length - TRUNCATED_FILENAME_SUFFIX_CHARS)
        .collect();
    format!("{}{}", prefix, suffix)
}

/// Where an image lands inside the images directory.
pub fn image_path(images_dir: &Path, source_url: &str) -> PathBuf {
    images_dir.join(image_filename(source_url))
}

/// Path as stored in the database: forward slashes, relative as given.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Canonical article URL for a title.
pub fn article_url(base: &str, title: &ItemTitle) -> String {
    format!("{}{}", base, title.url_form())
}
