//! Studio entry point behind basic auth.

use axum::{Router, extract::State, response::Redirect, routing::get};

use crate::error::{AppError, AppResult};
use crate::middleware::require_studio_auth;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/studio", get(open_studio))
        .route("/studio/{*path}", get(open_studio))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            require_studio_auth,
        ))
}

/// Redirect to the hosted studio, 404 when none is configured.
async fn open_studio(State(state): State<AppState>) -> AppResult<Redirect> {
    state
        .config()
        .studio_url
        .as_deref()
        .map(Redirect::temporary)
        .ok_or(AppError::NotFound)
}
