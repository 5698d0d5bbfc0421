//! Header search: results page and JSON endpoint.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
};
use serde::Serialize;

use crate::cms::ImageUrlBuilder;
use crate::listing::SearchResults;
use crate::models::SearchQuery;
use crate::seo::breadcrumbs;
use crate::state::AppState;
use crate::theme::view::RecipeCard;

use super::extract::LenientQuery;
use super::helpers::{inject_head, inject_site_context, render_page};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_page))
        .route("/api/search", get(search_api))
}

/// Search hits grouped by section.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub ricette: Vec<RecipeCard>,
    pub tecniche: Vec<RecipeCard>,
    pub diario: Vec<RecipeCard>,
}

impl SearchResponse {
    fn new(query: &str, results: &SearchResults, images: &ImageUrlBuilder) -> Self {
        Self {
            query: query.to_string(),
            total: results.total(),
            ricette: RecipeCard::list(&results.ricette, images),
            tecniche: RecipeCard::list(&results.tecniche, images),
            diario: RecipeCard::list(&results.diario, images),
        }
    }
}

async fn search_results(state: &AppState, query: &SearchQuery) -> SearchResponse {
    let term = query.term().unwrap_or_default();
    let results = state.recipes().search(term).await;
    SearchResponse::new(term, &results, state.images())
}

/// `/search?q=`; an empty query shows the form only.
async fn search_page(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<SearchQuery>,
) -> Response {
    let results = search_results(&state, &query).await;

    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, "/search");

    let crumbs = breadcrumbs::page("Cerca", "/search", Some("🔍"));
    let meta = state.seo().search(query.term(), results.total);
    inject_head(&state, &mut context, &meta, &crumbs, Vec::new());
    context.insert("searched", &query.term().is_some());
    context.insert("results", &results);

    render_page(&state, "search.html", &context, StatusCode::OK)
}

/// `/api/search?q=` as JSON.
async fn search_api(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<SearchQuery>,
) -> Json<SearchResponse> {
    Json(search_results(&state, &query).await)
}
