//! Types for the export module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One copied artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    /// Tracked file ID.
    pub file_id: String,
    /// Converted artifact that was copied.
    pub source: PathBuf,
    /// Where it was written.
    pub destination: PathBuf,
    /// Bytes written.
    pub size_bytes: u64,
}

/// What an export request ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExportOutcome {
    /// The user dismissed the picker. Nothing was written.
    Cancelled,
    /// No file in the batch was converted.
    NothingToExport,
    /// Every converted file was copied.
    Exported {
        files: Vec<ExportedFile>,
        /// Files skipped because their conversion failed.
        skipped: usize,
    },
}

impl ExportOutcome {
    pub fn exported_count(&self) -> usize {
        match self {
            Self::Exported { files, .. } => files.len(),
            _ => 0,
        }
    }
}
