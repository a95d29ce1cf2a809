//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::TargetFormat;

/// A request to convert one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Unique job ID (the tracked file's ID).
    pub job_id: String,
    /// Source file path.
    pub input_path: PathBuf,
    /// Target format, shared by the whole batch.
    pub format: TargetFormat,
}

impl ConversionRequest {
    pub fn new(
        job_id: impl Into<String>,
        input_path: impl Into<PathBuf>,
        format: TargetFormat,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            input_path: input_path.into(),
            format,
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Job ID.
    pub job_id: String,
    /// Where the converted artifact was written.
    pub output_path: PathBuf,
    /// Artifact size in bytes.
    pub output_size_bytes: u64,
    /// Conversion duration in milliseconds.
    pub duration_ms: u64,
    /// Format produced.
    pub format: TargetFormat,
}
