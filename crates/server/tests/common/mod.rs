//! Common test utilities for driving the API in-process with mocks.
//!
//! The fixture wires a real session controller to a mock converter, so runs
//! complete instantly and no ffmpeg binary is needed. Exports use the real
//! filesystem copier inside a temporary directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use mediabatch_core::testing::MockConverter;
use mediabatch_core::{
    create_session_controller, BatchOrchestrator, Config, ExportManager, FsCopier,
    SessionHandle, SessionState,
};
use mediabatch_server::state::AppState;

/// Test fixture with a running session controller.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_files() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/session/files", json!({
///         "paths": ["/videos/a.mov"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Handle to the controller behind the router
    pub session: SessionHandle,
    /// Mock converter - configure per-file failures
    pub converter: Arc<MockConverter>,
    /// Temporary directory holding converted artifacts and exports
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let converter = Arc::new(MockConverter::new());
        converter
            .set_output_dir(temp_dir.path().join("artifacts"))
            .await;

        let config = Config::default();

        let orchestrator = Arc::new(BatchOrchestrator::new(
            config.orchestrator.clone(),
            Arc::clone(&converter),
        ));
        let exporter = ExportManager::new(
            config.export.clone(),
            Arc::new(FsCopier::new(config.export.clone())),
        );
        let (session, controller) = create_session_controller(orchestrator, exporter, 16);
        tokio::spawn(controller.run());

        let state = Arc::new(AppState::new(config, session.clone()));
        let router = mediabatch_server::api::create_router(state);

        Self {
            router,
            session,
            converter,
            temp_dir,
        }
    }

    /// Path inside the fixture's temporary directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Waits until the session reaches `Finished`.
    pub async fn wait_finished(&self) {
        tokio::time::timeout(
            Duration::from_secs(5),
            self.session
                .wait_for(|s| s.state == SessionState::Finished),
        )
        .await
        .expect("Run did not finish in time")
        .expect("Session controller stopped");
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
