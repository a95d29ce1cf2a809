//! Error types for the session controller.

use thiserror::Error;

use crate::export::ExportError;
use crate::session::SessionError;

/// Errors returned through a [`SessionHandle`](super::SessionHandle).
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The session rejected the request.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The export failed. The session keeps the message as its error.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// The controller task is gone.
    #[error("session controller is not running")]
    Closed,
}

impl ControllerError {
    /// Whether the request was refused because of the session's state.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}
