//! Query-string extractor that never rejects a request.
//!
//! Repeated keys keep their first value and malformed input falls back to
//! the target's default, so a mangled link still renders the page.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;
use url::form_urlencoded;

/// Like `axum::extract::Query`, but lenient.
#[derive(Debug, Clone, Default)]
pub struct LenientQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for LenientQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parse_query(parts.uri.query().unwrap_or_default())))
    }
}

/// Decode a raw query string, keeping the first value of each key.
pub fn parse_query<T: DeserializeOwned + Default>(query: &str) -> T {
    let mut fields = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        fields
            .entry(key.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }
    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        debug!(error = %e, "unreadable query string, using defaults");
        T::default()
    })
}
