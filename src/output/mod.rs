// src/output/mod.rs
//! Output handling with clear separation of planning and execution.
//!
//! Path and filename derivation is pure (`paths`); the only file writes in
//! the crate happen in `writer`.

mod paths;
mod types;
mod writer;

// Re-export the public interface
#[allow(unused_imports)] // Used by lib crate
pub use paths::{article_url, display_path, image_filename, image_path, truncate_filename};
pub use types::{FailedImage, MaterializeReport, WrittenImage};
pub use writer::{create_directory, write_file};
