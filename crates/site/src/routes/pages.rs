//! About and contact pages.

use axum::{Router, extract::State, http::StatusCode, response::Response, routing::get};

use crate::seo::{breadcrumbs, structured_data};
use crate::state::AppState;
use crate::theme::view::AuthorView;

use super::helpers::{inject_head, inject_site_context, render_page};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chi-sono", get(about))
        .route("/contatti", get(contact))
}

/// Author profile; renders the static parts when no author record exists.
async fn about(State(state): State<AppState>) -> Response {
    let author = state.recipes().author().await;

    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, "/chi-sono");

    let crumbs = breadcrumbs::page("Chi sono", "/chi-sono", Some("👨‍🍳"));
    let json_ld = author
        .as_ref()
        .map(|a| structured_data::person(state.seo(), a))
        .into_iter()
        .collect();
    inject_head(
        &state,
        &mut context,
        &state.seo().about(author.as_ref()),
        &crumbs,
        json_ld,
    );
    context.insert(
        "author",
        &author.as_ref().map(|a| AuthorView::new(a, state.images())),
    );

    render_page(&state, "about.html", &context, StatusCode::OK)
}

async fn contact(State(state): State<AppState>) -> Response {
    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, "/contatti");

    let crumbs = breadcrumbs::page("Contatti", "/contatti", Some("✉️"));
    inject_head(&state, &mut context, &state.seo().contact(), &crumbs, Vec::new());

    render_page(&state, "contact.html", &context, StatusCode::OK)
}
