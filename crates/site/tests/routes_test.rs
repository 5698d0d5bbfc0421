#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Route tests against the real router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

use pastry_test_utils::{assert, bakery};

mod common;
use common::{
    FailingStore, FlakyStore, REVALIDATE_SECRET, STUDIO_PASSWORD, STUDIO_USER, TestApp, read,
    test_config,
};

fn app() -> TestApp {
    TestApp::new(&bakery(5, 10))
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn home_page_lists_recent_content() {
    let app = app();
    let (status, _, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Cristian&#x27;s Pastry | Blog di pasticceria moderna");
    assert::contains(&body, "Temperaggio del cioccolato");
    assert::contains(&body, "Il primo giorno in laboratorio");
    assert::contains(&body, "La pasticceria è precisione e cuore.");
}

#[tokio::test]
async fn recipe_listing_applies_category_filter() {
    let app = app();
    let (status, _, body) = app.get("/ricette?categoria=biscotti").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "5 ricette");
    assert::contains(&body, "Biscotti al burro 0");
    assert::not_contains(&body, "Torta margherita");
    assert::contains(
        &body,
        r#"<link rel="canonical" href="https://example.com/ricette?categoria=biscotti">"#,
    );
    assert::contains(&body, r#""@type":"CollectionPage""#);
}

#[tokio::test]
async fn recipe_listing_paginates() {
    let app = app();
    let (_, _, first) = app.get("/ricette").await;
    assert::contains(&first, r#"href="/ricette?page=2""#);

    let (status, _, past_end) = app.get("/ricette?page=9").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&past_end, "Nessuna ricetta in questa pagina");
}

#[tokio::test]
async fn malformed_page_falls_back_to_first() {
    let app = app();
    let (status, _, body) = app.get("/ricette?page=abc&difficolta=boh").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "17 ricette");
}

#[tokio::test]
async fn recipe_detail_renders_structured_data() {
    let app = app();
    let (status, _, body) = app.get("/ricette/biscotti-al-burro-0").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "<h1>Biscotti al burro 0</h1>");
    assert::contains(&body, r#""@type":"Recipe""#);
    assert::contains(&body, r#""@type":"BreadcrumbList""#);
    assert::contains(&body, r#"<meta property="og:type" content="article">"#);
}

#[tokio::test]
async fn unknown_recipe_is_not_found() {
    let app = app();
    let (status, _, body) = app.get("/ricette/non-esiste").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert::contains(&body, "Pagina non trovata");
    assert::contains(&body, "noindex");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app();
    let (status, _, _) = app.get("/pasticceria/segreta").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn section_pages_render() {
    let app = app();

    let (status, _, body) = app.get("/tecniche").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Temperaggio del cioccolato");
    assert::not_contains(&body, "Biscotti al burro");

    let (status, _, body) = app.get("/diario?page=0").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Il primo giorno in laboratorio");
}

#[tokio::test]
async fn about_and_contact_pages_render() {
    let app = app();

    let (status, _, body) = app.get("/chi-sono").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Pasticcere per passione.");
    assert::contains(&body, r#""@type":"Person""#);

    let (status, _, body) = app.get("/contatti").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "info@cristianspastry.com");
}

#[tokio::test]
async fn search_page_groups_results() {
    let app = app();
    let (status, _, body) = app.get("/search?q=burro").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "5 risultati");
    assert::contains(&body, "noindex");
}

#[tokio::test]
async fn search_api_returns_json() {
    let app = app();
    let (status, headers, body) = app.get("/api/search?q=cioccolato").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["total"], 1);
    assert_eq!(json["tecniche"][0]["href"], "/ricette/temperaggio-del-cioccolato");
    assert_eq!(json["ricette"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let app = app();
    let (status, _, body) = app.get("/ricette?q=margherita&q=burro&page=1&page=9").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Torta margherita");
    assert::not_contains(&body, "Biscotti al burro");

    let (status, _, _) = app.get("/search?q=torta&q=").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn failing_store_still_renders_pages() {
    let app = TestApp::with_store(Arc::new(FailingStore), test_config());

    let (status, _, body) = app.get("/ricette?categoria=biscotti").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Nessuna ricetta trovata");

    let (status, _, _) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Sitemap and robots
// =============================================================================

#[tokio::test]
async fn sitemap_lists_recipes() {
    let app = app();
    let (status, headers, body) = app.get("/sitemap.xml").await;

    assert_eq!(status, StatusCode::OK);
    assert::contains(
        headers[header::CONTENT_TYPE].to_str().unwrap(),
        "application/xml",
    );
    assert::contains(&body, "<loc>https://example.com/ricette/biscotti-al-burro-0</loc>");
    assert::contains(&body, "<loc>https://example.com/chi-sono</loc>");
    assert_eq!(body.matches("<url>").count(), 6 + 17);
}

#[tokio::test]
async fn robots_points_at_sitemap() {
    let app = app();
    let (status, _, body) = app.get("/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert::contains(&body, "Sitemap: https://example.com/sitemap.xml");
}

// =============================================================================
// Page cache and revalidation
// =============================================================================

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let app = app();
    let (_, first, _) = app.get("/ricette").await;
    let (_, second, _) = app.get("/ricette").await;

    assert_eq!(first["x-cache"], "MISS");
    assert_eq!(second["x-cache"], "HIT");
}

#[tokio::test]
async fn outage_renders_are_not_cached() {
    let store = FlakyStore::down(&bakery(5, 10));
    let app = TestApp::with_store(store.clone(), test_config());

    let (status, headers, body) = app.get("/ricette").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.get("x-cache").is_none());
    assert::contains(&body, "Nessuna ricetta trovata");

    let (_, headers, body) = app.get("/sitemap.xml").await;
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert_eq!(body.matches("<url>").count(), 6);
    assert!(app.state.cache().is_empty().await);

    store.recover();

    let (_, headers, body) = app.get("/ricette").await;
    assert_eq!(headers["x-cache"], "MISS");
    assert!(headers.get(header::CACHE_CONTROL).is_none());
    assert::not_contains(&body, "Nessuna ricetta trovata");
    assert::contains(&body, "Torta margherita");

    let (_, headers, body) = app.get("/sitemap.xml").await;
    assert_eq!(headers["x-cache"], "MISS");
    assert_eq!(body.matches("<url>").count(), 6 + 17);
}

#[tokio::test]
async fn not_found_pages_are_not_cached() {
    let app = app();
    app.get("/ricette/non-esiste").await;
    assert!(app.state.cache().is_empty().await);
}

#[tokio::test]
async fn webhook_rejects_wrong_secret() {
    let app = app();
    app.get("/").await;
    assert_eq!(app.state.cache().len().await, 1);

    let (status, _, body) = app.post("/api/revalidate?secret=sbagliato").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["message"], "Invalid secret");
    assert_eq!(app.state.cache().len().await, 1);
}

#[tokio::test]
async fn webhook_rejects_missing_secret() {
    let app = app();
    let (status, _, _) = app.post("/api/revalidate").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_rejects_everything_without_configured_secret() {
    let mut config = test_config();
    config.revalidate_secret = None;
    let app = TestApp::with_store(common::memory_store(&bakery(1, 1)), config);

    let (status, _, _) = app.post("/api/revalidate?secret=").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn webhook_clears_cache() {
    let app = app();
    app.get("/").await;
    app.get("/ricette").await;
    assert_eq!(app.state.cache().len().await, 2);

    let (status, _, body) = app
        .post(&format!("/api/revalidate?secret={REVALIDATE_SECRET}"))
        .await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["revalidated"], true);
    assert!(app.state.cache().is_empty().await);

    let (_, headers, _) = app.get("/").await;
    assert_eq!(headers["x-cache"], "MISS");
}

// =============================================================================
// Studio
// =============================================================================

fn studio_request(path: &str, credentials: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some((user, pass)) = credentials {
        let encoded = STANDARD.encode(format!("{user}:{pass}"));
        builder = builder.header(header::AUTHORIZATION, format!("Basic {encoded}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn studio_requires_credentials() {
    let app = app();
    let (status, headers, _) = read(app.request(studio_request("/studio", None)).await).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        headers[header::WWW_AUTHENTICATE],
        "Basic realm=\"Secure Area\""
    );

    let (status, _, _) = read(
        app.request(studio_request("/studio", Some((STUDIO_USER, "sbagliata"))))
            .await,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn studio_redirects_when_authenticated() {
    let app = app();
    let request = studio_request("/studio/desk/recipe", Some((STUDIO_USER, STUDIO_PASSWORD)));
    let (status, headers, _) = read(app.request(request).await).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        headers[header::LOCATION],
        "https://cristianspastry.sanity.studio"
    );
}

#[tokio::test]
async fn studio_without_url_is_not_found() {
    let mut config = test_config();
    config.studio_url = None;
    let app = TestApp::with_store(common::memory_store(&bakery(1, 1)), config);

    let request = studio_request("/studio", Some((STUDIO_USER, STUDIO_PASSWORD)));
    let (status, _, _) = read(app.request(request).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_backend() {
    let app = app();
    let (status, _, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["backend"], "memory");
    assert_eq!(json["recipes"], 17);
}

#[tokio::test]
async fn health_fails_when_store_is_down() {
    let app = TestApp::with_store(Arc::new(FailingStore), test_config());
    let (status, _, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
}
