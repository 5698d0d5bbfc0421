//! Page render cache middleware.
//!
//! Serves successful GET renders from [`PageCache`](crate::cache::PageCache)
//! and stores fresh ones. API, studio and health routes always pass through.
//! Renders built on degraded CMS reads are sent with `Cache-Control: no-store`
//! and never stored, so an outage does not outlive itself in the cache.

use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::cache::CachedPage;
use crate::listing::track_degraded;
use crate::state::AppState;

/// Largest body the cache will buffer.
const MAX_CACHED_BODY: usize = 4 * 1024 * 1024;

/// Paths never served from the cache.
const UNCACHED_PREFIXES: &[&str] = &["/api/", "/studio", "/health"];

/// Response header reporting cache status.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Cache key for a request: path plus raw query string.
pub fn cache_key(request: &Request<Body>) -> String {
    let uri = request.uri();
    match uri.query() {
        Some(q) if !q.is_empty() => format!("{}?{q}", uri.path()),
        _ => uri.path().to_string(),
    }
}

fn is_cacheable(request: &Request<Body>) -> bool {
    request.method() == Method::GET
        && !UNCACHED_PREFIXES
            .iter()
            .any(|prefix| request.uri().path().starts_with(prefix))
}

/// Serve cached renders; cache 200 responses built from healthy reads.
pub async fn cache_pages(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !is_cacheable(&request) {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    if let Some(page) = state.cache().get(&key).await {
        return cached_response(page, "HIT");
    }

    let generation = state.cache().generation();
    let (mut response, degraded) = track_degraded(next.run(request)).await;
    if degraded > 0 {
        debug!(key = %key, degraded, "degraded render not cached");
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        return response;
    }
    if response.status() != StatusCode::OK {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_CACHED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, key = %key, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html; charset=utf-8")
        .to_string();
    state
        .cache()
        .insert(
            key,
            CachedPage {
                content_type,
                body: bytes.clone(),
            },
            generation,
        )
        .await;

    parts
        .headers
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static("MISS"));
    Response::from_parts(parts, Body::from(bytes))
}

fn cached_response(page: CachedPage, status: &'static str) -> Response {
    let content_type = HeaderValue::from_str(&page.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("text/html; charset=utf-8"));
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static(status),
            ),
        ],
        page.body,
    )
        .into_response()
}
