// src/harvest/images.rs
//! Best-effort download of the images discovered during enrichment.

use crate::api::WikiRepository;
use crate::error::AppError;
use crate::output::{self, display_path, FailedImage, MaterializeReport, WrittenImage};
use crate::types::ValidatedUrl;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// A remote image and the local path it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub source_url: String,
    pub local_path: PathBuf,
}

impl ImageReference {
    /// The local path is derived from the URL's final segment, so the path
    /// recorded for an item and the file written for it always agree.
    pub fn new(source_url: &str, images_dir: &Path) -> Self {
        Self {
            source_url: source_url.to_string(),
            local_path: output::image_path(images_dir, source_url),
        }
    }

    /// The path as recorded alongside the item.
    pub fn stored_path(&self) -> String {
        display_path(&self.local_path)
    }
}

/// Downloads image references and writes them to disk.
pub struct ImageMaterializer<'a> {
    repository: &'a dyn WikiRepository,
    concurrency: usize,
}

impl<'a> ImageMaterializer<'a> {
    pub fn new(repository: &'a dyn WikiRepository, concurrency: usize) -> Self {
        Self {
            repository,
            concurrency: concurrency.max(1),
        }
    }

    /// Attempts every reference; failures are recorded, never propagated.
    pub async fn materialize(&self, references: &[ImageReference]) -> MaterializeReport {
        log::info!("Downloading {} image(s)", references.len());

        let pending: Vec<_> = references
            .iter()
            .enumerate()
            .map(|(index, reference)| async move { (index, self.materialize_one(reference).await) })
            .collect();
        let outcomes: Vec<(usize, Result<WrittenImage, AppError>)> = stream::iter(pending)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let total = references.len();
        let mut report = MaterializeReport::new(total);
        for (done, (index, outcome)) in outcomes.into_iter().enumerate() {
            let reference = &references[index];
            match outcome {
                Ok(written) => report = report.with_written(written),
                Err(e) => {
                    log::warn!("Skipping image {}: {}", reference.source_url, e);
                    report = report.with_failed(FailedImage {
                        source_url: reference.source_url.clone(),
                        error: e.to_string(),
                    });
                }
            }
            log::debug!("images: {} / {}", done + 1, total);
        }

        log::info!(
            "Images: {} written, {} skipped ({} bytes)",
            report.written.len(),
            report.failed.len(),
            report.bytes_written
        );
        report
    }

    async fn materialize_one(&self, reference: &ImageReference) -> Result<WrittenImage, AppError> {
        let url = ValidatedUrl::parse(&reference.source_url).map_err(|e| {
            AppError::ImageFetchFailed {
                url: reference.source_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let bytes = self
            .repository
            .download(url.as_str())
            .await
            .map_err(|e| AppError::ImageFetchFailed {
                url: reference.source_url.clone(),
                reason: e.to_string(),
            })?;

        let bytes_written = output::write_file(&reference.local_path, &bytes).await?;
        Ok(WrittenImage {
            path: reference.local_path.clone(),
            bytes_written,
        })
    }
}
