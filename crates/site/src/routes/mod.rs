//! HTTP route handlers.

pub mod extract;
pub mod front;
pub mod health;
pub mod helpers;
pub mod pages;
pub mod recipes;
pub mod revalidate;
pub mod search;
pub mod sections;
pub mod seo;
pub mod studio;

use axum::{Router, extract::State, http::Uri, response::Response};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(front::router())
        .merge(recipes::router())
        .merge(sections::router())
        .merge(pages::router())
        .merge(search::router())
        .merge(seo::router())
        .merge(revalidate::router())
        .merge(health::router())
        .merge(studio::router(state.clone()))
        .fallback(fallback)
        // Middleware layers (last added = first executed in request flow):
        // TraceLayer → compression → page cache → routes
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::cache_pages,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    helpers::not_found_page(&state, uri.path())
}
