//! Revalidation webhook.
//!
//! Called by the CMS on publish. A matching `?secret=` clears every cached
//! render; the request body is ignored.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use serde_json::{Value, json};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::RevalidateQuery;
use crate::state::AppState;

use super::extract::LenientQuery;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/revalidate", post(revalidate))
}

async fn revalidate(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<RevalidateQuery>,
) -> AppResult<Json<Value>> {
    let authorized = secret_matches(
        query.secret.as_deref(),
        state.config().revalidate_secret.as_deref(),
    );
    if !authorized {
        warn!("revalidation rejected: invalid secret");
        return Err(AppError::Unauthorized("Invalid secret"));
    }

    state.cache().invalidate_all().await;
    info!("revalidation successful");
    Ok(Json(json!({ "revalidated": true })))
}

/// Constant-time secret check; an unset expected secret rejects everything.
fn secret_matches(given: Option<&str>, expected: Option<&str>) -> bool {
    match (given, expected) {
        (Some(given), Some(expected)) => given.as_bytes().ct_eq(expected.as_bytes()).into(),
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn secret_check() {
        assert!(secret_matches(Some("abc"), Some("abc")));
        assert!(!secret_matches(Some("abd"), Some("abc")));
        assert!(!secret_matches(Some("ab"), Some("abc")));
        assert!(!secret_matches(None, Some("abc")));
        assert!(!secret_matches(Some("abc"), None));
        assert!(!secret_matches(None, None));
    }
}
