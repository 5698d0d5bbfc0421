#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Sanity HTTP client against a mock query API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pastry_site::cms::{
    CmsError, ContentQuery, ContentStore, RecipeFilter, SanityConfig, SanityStore,
};
use pastry_site::listing::RecipeQueryService;

const QUERY_PATH: &str = "/v2024-01-01/data/query/production";

fn store(server: &MockServer, token: Option<&str>) -> SanityStore {
    let mut config = SanityConfig::new("testproj", "production");
    config.api_host = Some(server.uri());
    config.token = token.map(str::to_string);
    config.timeout = Duration::from_secs(2);
    SanityStore::new(config)
}

#[test]
fn endpoint_uses_cdn_host() {
    let mut config = SanityConfig::new("abc123", "production");
    assert_eq!(
        config.endpoint(),
        "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
    );
    config.use_cdn = false;
    config.api_version = "v2025-02-19".into();
    assert_eq!(
        config.endpoint(),
        "https://abc123.api.sanity.io/v2025-02-19/data/query/production"
    );
}

#[tokio::test]
async fn sends_query_with_bound_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(header("authorization", "Bearer read-token"))
        .and(body_partial_json(json!({
            "params": { "category": "biscotti", "difficulty": "facile" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "count(...)",
            "result": 4,
            "ms": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server, Some("read-token"));
    let filter = RecipeFilter::new(Some("Biscotti"), Some("facile"), None);
    let result = store
        .fetch(&ContentQuery::RecipeCount { filter })
        .await
        .unwrap();

    assert_eq!(result, json!(4));
}

#[tokio::test]
async fn slug_is_never_spliced_into_query_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_partial_json(json!({ "params": { "slug": "torta\"] || true" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store(&server, None);
    let result = store
        .fetch(&ContentQuery::RecipeBySlug {
            slug: "torta\"] || true".into(),
        })
        .await
        .unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("param $category referenced, but not provided"))
        .mount(&server)
        .await;

    let err = store(&server, None)
        .fetch(&ContentQuery::TotalRecipes)
        .await
        .unwrap_err();

    match err {
        CmsError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("not provided"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = store(&server, None)
        .fetch(&ContentQuery::TotalRecipes)
        .await
        .unwrap_err();
    assert!(matches!(err, CmsError::Decode(_)));
}

#[tokio::test]
async fn listing_over_http_drops_bad_entries() {
    let server = MockServer::start().await;

    // First registered match wins, so the facet query goes first
    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("references(^._id)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{ "title": "Biscotti", "count": 1 }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("[0...12]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "_id": "r1", "title": "Cantucci", "slug": "cantucci", "categories": [{ "title": "Biscotti" }] },
                null,
                { "_id": "r2", "title": "Senza slug", "slug": null }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(QUERY_PATH))
        .and(body_string_contains("count(*["))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 3 })))
        .mount(&server)
        .await;

    let service = RecipeQueryService::new(Arc::new(store(&server, None)));
    let listing = service.list_recipes(&RecipeFilter::default(), 1).await;

    assert_eq!(listing.total_count, 3);
    assert_eq!(listing.recipes.len(), 1);
    assert_eq!(listing.recipes[0].title, "Cantucci");
    assert_eq!(listing.categories.len(), 1);
}

#[tokio::test]
async fn unreachable_host_degrades_listing() {
    let mut config = SanityConfig::new("testproj", "production");
    config.api_host = Some("http://127.0.0.1:9".to_string());
    config.timeout = Duration::from_millis(500);
    let service = RecipeQueryService::new(Arc::new(SanityStore::new(config)));

    let listing = service.list_recipes(&RecipeFilter::default(), 2).await;
    assert!(listing.recipes.is_empty());
    assert_eq!(listing.current_page, 2);
}
