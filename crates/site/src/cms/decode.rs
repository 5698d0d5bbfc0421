//! Boundary decoding of raw query results.
//!
//! Query results are untrusted JSON. These helpers turn them into typed
//! entities, dropping entries that cannot be listed and logging how many.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Decode a list of CMS documents.
///
/// Entries that are not objects, lack a non-empty string `_id`, or fail to
/// deserialize (for example because the slug is missing) are dropped.
pub fn decode_list<T: DeserializeOwned>(value: Value, what: &'static str) -> Vec<T> {
    decode_entries(value, what, true)
}

/// Decode a list of projected rows that carry no document id.
pub fn decode_rows<T: DeserializeOwned>(value: Value, what: &'static str) -> Vec<T> {
    decode_entries(value, what, false)
}

/// Decode a single optional document; `null` and malformed values are `None`.
pub fn decode_optional<T: DeserializeOwned>(value: Value, what: &'static str) -> Option<T> {
    match value {
        Value::Null => None,
        Value::Object(_) => match serde_json::from_value(value) {
            Ok(entity) => Some(entity),
            Err(e) => {
                warn!(what, error = %e, "dropping malformed document");
                None
            }
        },
        other => {
            warn!(what, kind = json_kind(&other), "expected an object");
            None
        }
    }
}

fn decode_entries<T: DeserializeOwned>(value: Value, what: &'static str, require_id: bool) -> Vec<T> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Null => return Vec::new(),
        other => {
            warn!(what, kind = json_kind(&other), "expected a list");
            return Vec::new();
        }
    };

    let total = entries.len();
    let decoded: Vec<T> = entries
        .into_iter()
        .filter(|entry| entry.is_object() && (!require_id || has_id(entry)))
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(entity) => Some(entity),
            Err(e) => {
                debug!(what, error = %e, "entry failed to decode");
                None
            }
        })
        .collect();

    let dropped = total - decoded.len();
    if dropped > 0 {
        warn!(what, dropped, kept = decoded.len(), "dropped malformed entries");
    }
    decoded
}

fn has_id(entry: &Value) -> bool {
    entry
        .get("_id")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::{CategoryFacet, RecipeSummary};
    use serde_json::json;

    #[test]
    fn drops_unlistable_entries() {
        let raw = json!([
            {"_id": "a", "title": "Ok", "slug": "ok"},
            null,
            "stringa",
            {"title": "No id", "slug": "no-id"},
            {"_id": "", "slug": "blank-id"},
            {"_id": "b", "title": "No slug"},
            {"_id": "c", "title": "Null slug", "slug": null},
            {"_id": "d", "title": "Nested", "slug": {"current": "nested"}}
        ]);

        let recipes: Vec<RecipeSummary> = decode_list(raw, "recipes");
        let slugs: Vec<_> = recipes.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["ok", "nested"]);
    }

    #[test]
    fn non_list_results_are_empty() {
        assert!(decode_list::<RecipeSummary>(Value::Null, "recipes").is_empty());
        assert!(decode_list::<RecipeSummary>(json!({"_id": "a"}), "recipes").is_empty());
    }

    #[test]
    fn rows_need_no_id() {
        let facets: Vec<CategoryFacet> = decode_rows(
            json!([{"title": "Biscotti", "count": 2}, {"title": null, "count": 1}]),
            "facets",
        );
        assert_eq!(facets.len(), 1);
    }

    #[test]
    fn optional_document() {
        assert!(decode_optional::<RecipeSummary>(Value::Null, "recipe").is_none());
        assert!(decode_optional::<RecipeSummary>(json!(["x"]), "recipe").is_none());
        let found: Option<RecipeSummary> =
            decode_optional(json!({"_id": "a", "slug": "a"}), "recipe");
        assert!(found.is_some());
    }
}
