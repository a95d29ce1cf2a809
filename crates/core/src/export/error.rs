//! Error types for the export module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while exporting converted files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The converted artifact is gone.
    #[error("Converted file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Destination already exists and overwrite is disabled.
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    /// Failed to create the destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file.
    #[error("Failed to copy {source} to {destination}: {error}")]
    CopyFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The copy does not match its source.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Failed to read a file back for verification.
    #[error("Failed to calculate checksum for {path}")]
    ChecksumCalculationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A done file has no artifact path to name the copy after.
    #[error("Converted file has no usable name: {path}")]
    InvalidArtifact { path: PathBuf },
}

impl ExportError {
    /// Creates a copy failed error.
    pub fn copy_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed {
            source,
            destination,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExportError::copy_failed(
            PathBuf::from("/tmp/a.mp4"),
            PathBuf::from("/out/converted_a.mp4"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to copy /tmp/a.mp4 to /out/converted_a.mp4: denied"
        );

        let err = ExportError::DestinationExists {
            path: PathBuf::from("/out/x.png"),
        };
        assert_eq!(err.to_string(), "Destination already exists: /out/x.png");
    }
}
