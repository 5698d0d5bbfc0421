#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the real router and query service over an in-memory store
//! built from `pastry-test-utils` fixtures. Each test builds its own app.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use pastry_site::cms::{CmsError, ContentQuery, ContentStore, MemoryStore};
use pastry_site::config::Config;
use pastry_site::routes;
use pastry_site::state::AppState;
use pastry_site::theme::ThemeEngine;
use pastry_test_utils::Dataset;

pub const REVALIDATE_SECRET: &str = "test-secret";
pub const STUDIO_USER: &str = "cristian";
pub const STUDIO_PASSWORD: &str = "pan-di-spagna";

/// Templates shipped at the workspace root.
pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// Configuration for tests; no environment access.
pub fn test_config() -> Config {
    Config {
        port: 0,
        site_url: "https://example.com".to_string(),
        sanity_project_id: Some("testproj".to_string()),
        sanity_dataset: "production".to_string(),
        sanity_api_version: "2024-01-01".to_string(),
        sanity_use_cdn: false,
        sanity_api_token: None,
        sanity_timeout_secs: 5,
        fixture_path: None,
        revalidate_secret: Some(REVALIDATE_SECRET.to_string()),
        revalidate_ttl_secs: 3600,
        studio_username: Some(STUDIO_USER.to_string()),
        studio_password: Some(STUDIO_PASSWORD.to_string()),
        studio_url: Some("https://cristianspastry.sanity.studio".to_string()),
        templates_dir: templates_dir(),
    }
}

pub fn memory_store(data: &Dataset) -> Arc<dyn ContentStore> {
    Arc::new(MemoryStore::new(data.documents().to_vec()))
}

/// A store whose every read fails.
pub struct FailingStore;

#[async_trait]
impl ContentStore for FailingStore {
    async fn fetch(&self, _query: &ContentQuery) -> Result<Value, CmsError> {
        Err(CmsError::Status {
            status: 503,
            body: "upstream unavailable".to_string(),
        })
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

/// A memory store that can be switched into an outage and back.
pub struct FlakyStore {
    inner: MemoryStore,
    down: AtomicBool,
}

impl FlakyStore {
    pub fn down(data: &Dataset) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(data.documents().to_vec()),
            down: AtomicBool::new(true),
        })
    }

    pub fn recover(&self) {
        self.down.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentStore for FlakyStore {
    async fn fetch(&self, query: &ContentQuery) -> Result<Value, CmsError> {
        if self.down.load(Ordering::SeqCst) {
            return FailingStore.fetch(query).await;
        }
        self.inner.fetch(query).await
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(data: &Dataset) -> Self {
        Self::with_store(memory_store(data), test_config())
    }

    pub fn with_store(store: Arc<dyn ContentStore>, config: Config) -> Self {
        let theme = ThemeEngine::new(&config.templates_dir).expect("templates load");
        let state = AppState::with_store(config, store, theme);
        Self {
            router: routes::app(state.clone()),
            state,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// GET a path, returning status, headers and body text.
    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        read(self.request(request).await).await
    }

    /// POST an empty JSON body.
    pub async fn post(&self, uri: &str) -> (StatusCode, HeaderMap, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        read(self.request(request).await).await
    }
}

pub async fn read(response: Response) -> (StatusCode, HeaderMap, String) {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}
