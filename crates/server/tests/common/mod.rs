//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock catalog and a JSON history in a temporary directory.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use booksearch_core::config::HistoryConfig;
use booksearch_core::testing::MockCatalog;
use booksearch_core::{open_history_store, BookCatalog, Config, HistoryStore};

/// Re-export fixtures for test convenience
pub use booksearch_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.catalog.add_book(fixtures::google_book("A1", "Dune", "Frank Herbert")).await;
///
///     let response = fixture.get("/books?keyword=dune").await;
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure books and inject failures
    pub catalog: Arc<MockCatalog>,
    /// The history store behind the router
    pub history: Arc<HistoryStore>,
    /// Temporary directory holding the history files
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.history = HistoryConfig {
            dir: temp_dir.path().join("history"),
            ..Default::default()
        };

        let catalog = Arc::new(MockCatalog::new());
        let history = Arc::new(
            open_history_store(&config.history).expect("Failed to open history store"),
        );

        let state = Arc::new(booksearch_server::state::AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn BookCatalog>,
            Arc::clone(&history),
        ));
        let router = booksearch_server::api::create_router(state);

        Self {
            router,
            catalog,
            history,
            temp_dir,
        }
    }

    pub fn history_dir(&self) -> PathBuf {
        self.temp_dir.path().join("history")
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

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
