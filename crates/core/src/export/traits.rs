//! Trait definitions for the export module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::ExportError;

/// Copies one converted artifact to its destination.
#[async_trait]
pub trait FileCopier: Send + Sync {
    /// Returns the name of this copier implementation.
    fn name(&self) -> &str;

    /// Copies `source` to `destination`, returning the number of bytes written.
    async fn copy(&self, source: &Path, destination: &Path) -> Result<u64, ExportError>;
}

/// Asks the user where exported files go.
///
/// `None` means the user cancelled.
#[async_trait]
pub trait DestinationPicker: Send + Sync {
    /// Asks for a file path, proposing `suggested_name`.
    async fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf>;

    /// Asks for a directory.
    async fn pick_directory(&self) -> Option<PathBuf>;
}
