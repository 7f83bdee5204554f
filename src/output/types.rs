// src/output/types.rs
//! Type definitions for image output.

use std::path::PathBuf;

/// Result of materializing a set of image references.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// References handed to the materializer
    pub attempted: usize,
    /// Files written
    pub written: Vec<WrittenImage>,
    /// Downloads skipped after a failure
    pub failed: Vec<FailedImage>,
    pub bytes_written: usize,
}

impl MaterializeReport {
    pub fn new(attempted: usize) -> Self {
        Self {
            attempted,
            ..Default::default()
        }
    }

    pub fn with_written(mut self, image: WrittenImage) -> Self {
        self.bytes_written += image.bytes_written;
        self.written.push(image);
        self
    }

    pub fn with_failed(mut self, image: FailedImage) -> Self {
        self.failed.push(image);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct WrittenImage {
    pub path: PathBuf,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedImage {
    pub source_url: String,
    pub error: String,
}
