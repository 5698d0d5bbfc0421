//! Basic-auth gate for the studio routes.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const REALM: &str = "Secure Area";

/// Reject requests without valid studio credentials.
///
/// With no credentials configured every request is rejected.
pub async fn require_studio_auth(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> AppResult<Response> {
    let config = state.config();
    let (Some(username), Some(password)) = (
        config.studio_username.as_deref(),
        config.studio_password.as_deref(),
    ) else {
        debug!("studio credentials not configured");
        return Err(AppError::AuthRequired { realm: REALM });
    };

    match basic_credentials(request.headers()) {
        Some((user, pass)) if credentials_match(&user, &pass, username, password) => {
            Ok(next.run(request).await)
        }
        _ => Err(AppError::AuthRequired { realm: REALM }),
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value
        .strip_prefix("Basic ")
        .or_else(|| value.strip_prefix("basic "))?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Compare both fields without short-circuiting.
fn credentials_match(user: &str, pass: &str, expected_user: &str, expected_pass: &str) -> bool {
    let user_ok = user.as_bytes().ct_eq(expected_user.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(expected_pass.as_bytes());
    (user_ok & pass_ok).into()
}
