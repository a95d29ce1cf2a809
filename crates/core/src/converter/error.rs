//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during conversion.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Input path cannot be turned into an output name.
    #[error("Invalid input file: {path}")]
    InvalidInput { path: PathBuf },

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Conversion process failed.
    #[error("Conversion failed: {reason}")]
    ConversionFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Building an SVG wrapper around a raster image failed.
    #[error("Failed to embed image into SVG: {reason}")]
    EmbedFailed { reason: String },

    /// I/O error during conversion.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a new conversion failed error with stderr output.
    pub fn conversion_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::ConversionFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new embed failed error.
    pub fn embed_failed(reason: impl Into<String>) -> Self {
        Self::EmbedFailed {
            reason: reason.into(),
        }
    }

    /// Whether the engine itself is unusable, as opposed to a bad input file.
    pub fn is_engine_missing(&self) -> bool {
        matches!(self, Self::FfmpegNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConverterError::conversion_failed("FFmpeg exited with code: Some(1)", None);
        assert_eq!(
            err.to_string(),
            "Conversion failed: FFmpeg exited with code: Some(1)"
        );

        let err = ConverterError::Timeout { timeout_secs: 30 };
        assert_eq!(err.to_string(), "Conversion timed out after 30 seconds");
    }

    #[test]
    fn test_is_engine_missing() {
        let err = ConverterError::FfmpegNotFound {
            path: PathBuf::from("ffmpeg"),
        };
        assert!(err.is_engine_missing());
        assert!(!ConverterError::embed_failed("bad header").is_engine_missing());
    }
}
