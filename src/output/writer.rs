// src/output/writer.rs
//! Executes file output by performing actual I/O.
//!
//! This module is the only place where file writes occur,
//! keeping the rest of the codebase pure and testable.

use crate::error::AppError;
use std::path::Path;

/// Writes bytes to a file, creating parent directories if needed.
pub async fn write_file(path: &Path, content: &[u8]) -> Result<usize, AppError> {
    log::debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, content).await?;
    Ok(content.len())
}

/// Creates a directory, accepting one that already exists.
pub async fn create_directory(path: &Path) -> Result<(), AppError> {
    log::debug!("Creating directory: {}", path.display());

    if path.exists() {
        if path.is_dir() {
            log::debug!("Directory already exists: {}", path.display());
            return Ok(());
        }
        return Err(AppError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", path.display()),
        )));
    }

    tokio::fs::create_dir_all(path).await?;
    log::info!("Created directory: {}", path.display());
    Ok(())
}
