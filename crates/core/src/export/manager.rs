//! Export of a finished batch.
//!
//! A batch of one is saved to a user-chosen file path; larger batches go to a
//! user-chosen directory. Every copy is named `<prefix><stem>.<ext>` where
//! `<ext>` is the converted artifact's extension. Failed files are skipped;
//! the first copy failure stops the export without undoing earlier copies.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::session::{Batch, TrackedFile};

use super::config::ExportConfig;
use super::error::ExportError;
use super::traits::{DestinationPicker, FileCopier};
use super::types::{ExportOutcome, ExportedFile};

/// Copies converted artifacts out of the temporary area.
pub struct ExportManager<F>
where
    F: FileCopier + 'static,
{
    config: ExportConfig,
    copier: Arc<F>,
}

impl<F> ExportManager<F>
where
    F: FileCopier + 'static,
{
    pub fn new(config: ExportConfig, copier: Arc<F>) -> Self {
        Self { config, copier }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Name proposed for the exported copy of `file`, if it was converted.
    pub fn export_name(&self, file: &TrackedFile) -> Option<String> {
        let result = file.result_path()?;
        let name = match result.extension() {
            Some(ext) => format!(
                "{}{}.{}",
                self.config.file_prefix,
                file.stem(),
                ext.to_string_lossy()
            ),
            None => format!("{}{}", self.config.file_prefix, file.stem()),
        };
        Some(name)
    }

    /// Exports every converted file of a finished `batch`.
    pub async fn export(
        &self,
        batch: &Batch,
        picker: &dyn DestinationPicker,
    ) -> Result<ExportOutcome, ExportError> {
        let done: Vec<&TrackedFile> = batch.iter().filter(|f| f.result_path().is_some()).collect();
        if done.is_empty() {
            debug!("No converted files to export");
            return Ok(ExportOutcome::NothingToExport);
        }
        let skipped = batch.len() - done.len();

        if batch.len() == 1 {
            self.export_single(done[0], picker).await
        } else {
            self.export_many(&done, skipped, picker).await
        }
    }

    async fn export_single(
        &self,
        file: &TrackedFile,
        picker: &dyn DestinationPicker,
    ) -> Result<ExportOutcome, ExportError> {
        let suggested = self
            .export_name(file)
            .ok_or_else(|| ExportError::InvalidArtifact {
                path: file.source_path.clone(),
            })?;

        let Some(destination) = picker.pick_save_path(&suggested).await else {
            debug!("Save dialog cancelled");
            return Ok(ExportOutcome::Cancelled);
        };

        let exported = self.copy_one(file, destination).await?;
        info!("Exported {} to {}", file.display_name, exported.destination.display());
        Ok(ExportOutcome::Exported {
            files: vec![exported],
            skipped: 0,
        })
    }

    async fn export_many(
        &self,
        done: &[&TrackedFile],
        skipped: usize,
        picker: &dyn DestinationPicker,
    ) -> Result<ExportOutcome, ExportError> {
        let Some(directory) = picker.pick_directory().await else {
            debug!("Directory dialog cancelled");
            return Ok(ExportOutcome::Cancelled);
        };

        let mut files = Vec::with_capacity(done.len());
        for file in done {
            let name = self
                .export_name(file)
                .ok_or_else(|| ExportError::InvalidArtifact {
                    path: file.source_path.clone(),
                })?;
            match self.copy_one(file, directory.join(name)).await {
                Ok(exported) => files.push(exported),
                Err(e) => {
                    warn!(
                        "Export stopped at {} after {} file(s): {}",
                        file.display_name,
                        files.len(),
                        e
                    );
                    return Err(e);
                }
            }
        }

        info!(
            "Exported {} file(s) to {} ({} skipped)",
            files.len(),
            directory.display(),
            skipped
        );
        Ok(ExportOutcome::Exported { files, skipped })
    }

    async fn copy_one(
        &self,
        file: &TrackedFile,
        destination: PathBuf,
    ) -> Result<ExportedFile, ExportError> {
        let source = file
            .result_path()
            .ok_or_else(|| ExportError::InvalidArtifact {
                path: file.source_path.clone(),
            })?
            .to_path_buf();

        let size_bytes = self.copier.copy(&source, &destination).await?;
        Ok(ExportedFile {
            file_id: file.id.clone(),
            source,
            destination,
            size_bytes,
        })
    }
}
