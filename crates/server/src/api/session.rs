//! Session API handlers.
//!
//! Each handler forwards one request to the session controller and answers
//! with the resulting snapshot. Requests the session refuses in its current
//! state come back as `409 Conflict` and leave it unchanged.

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use mediabatch_core::classifier::UnknownFormat;
use mediabatch_core::{
    ControllerError, DestinationPicker, ExportError, ExportOutcome, SessionError, SessionSnapshot,
    TargetFormat,
};

use super::handlers::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

/// Request body for adding files
#[derive(Debug, Deserialize)]
pub struct AddFilesBody {
    pub paths: Vec<PathBuf>,
}

/// Request body for choosing the output format
#[derive(Debug, Deserialize)]
pub struct SelectFormatBody {
    /// Format label or extension, case-insensitive
    pub format: String,
}

/// Request body for exporting a finished batch
///
/// `destination` is the output file for a batch of one and the output
/// directory otherwise. `null` stands for a dismissed dialog.
#[derive(Debug, Deserialize)]
pub struct ExportBody {
    pub destination: Option<PathBuf>,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// Error returned by the session handlers.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ControllerError> for ApiError {
    fn from(err: ControllerError) -> Self {
        let status = match &err {
            ControllerError::Session(_) => StatusCode::CONFLICT,
            ControllerError::Export(ExportError::DestinationExists { .. }) => StatusCode::CONFLICT,
            ControllerError::Export(ExportError::SourceNotFound { .. })
            | ControllerError::Export(ExportError::InvalidArtifact { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ControllerError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ControllerError::Closed => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Destination Picker
// ============================================================================

/// Answers the export dialogs with the destination sent by the client.
struct RequestPicker {
    destination: Option<PathBuf>,
}

#[async_trait]
impl DestinationPicker for RequestPicker {
    async fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        debug!("Save path requested (suggested {})", suggested_name);
        self.destination.clone()
    }

    async fn pick_directory(&self) -> Option<PathBuf> {
        self.destination.clone()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Current session snapshot
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSnapshot> {
    Json(state.session().snapshot())
}

/// Add files chosen through a picker
pub async fn add_files(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddFilesBody>,
) -> ApiResult<SessionSnapshot> {
    Ok(Json(state.session().add_files(body.paths).await?))
}

/// Add files delivered by drag-and-drop
pub async fn drop_files(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddFilesBody>,
) -> ApiResult<SessionSnapshot> {
    Ok(Json(state.session().drop_files(body.paths).await?))
}

pub async fn remove_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<SessionSnapshot> {
    match state.session().remove_file(id).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(ControllerError::Session(SessionError::FileNotFound(id))) => Err(
            ApiError::new(StatusCode::NOT_FOUND, format!("file not found: {}", id)),
        ),
        Err(e) => Err(e.into()),
    }
}

pub async fn select_format(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectFormatBody>,
) -> ApiResult<SessionSnapshot> {
    let format: TargetFormat = body
        .format
        .parse()
        .map_err(|e: UnknownFormat| {
            ApiError::new(StatusCode::BAD_REQUEST, e.to_string())
        })?;
    Ok(Json(state.session().select_format(format).await?))
}

/// Start converting the batch. Answers as soon as the run has started.
pub async fn convert(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    Ok(Json(state.session().convert().await?))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    Ok(Json(state.session().reset().await?))
}

pub async fn dismiss_error(State(state): State<Arc<AppState>>) -> ApiResult<SessionSnapshot> {
    Ok(Json(state.session().dismiss_error().await?))
}

/// Export the finished batch
pub async fn export(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExportBody>,
) -> ApiResult<ExportOutcome> {
    let picker = Box::new(RequestPicker {
        destination: body.destination,
    });
    Ok(Json(state.session().export(picker).await?))
}
