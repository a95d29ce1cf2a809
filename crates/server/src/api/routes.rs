use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{handlers, session, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/formats", get(handlers::get_formats))
        // Session
        .route("/session", get(session::get_session))
        .route("/session/files", post(session::add_files))
        .route("/session/drop", post(session::drop_files))
        .route("/session/files/{id}", delete(session::remove_file))
        .route("/session/format", put(session::select_format))
        .route("/session/convert", post(session::convert))
        .route("/session/reset", post(session::reset))
        .route("/session/error", delete(session::dismiss_error))
        .route("/session/export", post(session::export))
        // Live snapshots
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
