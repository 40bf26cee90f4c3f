//! Subcommand implementations.

pub mod account;
pub mod books;
pub mod catalogue;
pub mod lists;
pub mod profile;

use std::path::Path;

use anyhow::{Context, Result};

use bookshelf_core::FileUpload;

/// Read an image from disk for upload.
fn read_upload(path: &Path) -> Result<FileUpload> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Upload path has no file name")?;
    Ok(FileUpload::new(file_name, bytes))
}
