use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use mediabatch_core::{
    allowed_formats, classify, default_format, MediaCategory, SanitizedConfig, TargetFormat,
};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body shared by every API handler.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// Query parameters for the format catalogue. `category` wins over `file`.
#[derive(Debug, Deserialize)]
pub struct FormatsParams {
    pub category: Option<String>,
    pub file: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormatsResponse {
    pub category: MediaCategory,
    pub formats: Vec<TargetFormat>,
    pub default: TargetFormat,
}

pub async fn get_formats(
    Query(params): Query<FormatsParams>,
) -> Result<Json<FormatsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let category = match (params.category, params.file) {
        (Some(category), _) => category.parse::<MediaCategory>().map_err(|e| {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
        })?,
        (None, Some(file)) => classify(&file),
        (None, None) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("expected a category or file parameter")),
            ))
        }
    };

    Ok(Json(FormatsResponse {
        category,
        formats: allowed_formats(category).to_vec(),
        default: default_format(category),
    }))
}
