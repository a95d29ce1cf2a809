//! Error types for the session module.

use thiserror::Error;

use crate::classifier::{MediaCategory, TargetFormat};

use super::types::SessionState;

/// Errors returned when an event is not legal in the current state.
///
/// A rejected event never changes the session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The event is not accepted in this state.
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: SessionState,
        action: &'static str,
    },

    /// A running batch cannot be reset.
    #[error("a running batch cannot be reset")]
    NotResettable,

    /// Conversion requested with nothing selected.
    #[error("no files selected")]
    EmptyBatch,

    /// The format is not offered for the batch's category.
    #[error("format {format} is not available for {category} files")]
    FormatNotAllowed {
        format: TargetFormat,
        category: MediaCategory,
    },

    /// No file with this ID in the batch.
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// A file status update would move the file backward.
    #[error("file {file_id} cannot move from {from} to {to}")]
    InvalidFileTransition {
        file_id: String,
        from: &'static str,
        to: &'static str,
    },
}
