//! Technique and diary listings.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Response,
    routing::get,
};

use crate::classify::Section;
use crate::listing::section_href;
use crate::models::PageQuery;
use crate::seo::breadcrumbs;
use crate::state::AppState;
use crate::theme::view::RecipeCard;

use super::extract::LenientQuery;
use super::helpers::{inject_head, inject_site_context, render_page};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tecniche", get(techniques))
        .route("/diario", get(diary))
}

async fn techniques(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<PageQuery>,
) -> Response {
    section_page(&state, Section::Tecniche, query.page()).await
}

async fn diary(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<PageQuery>,
) -> Response {
    section_page(&state, Section::Diario, query.page()).await
}

async fn section_page(state: &AppState, section: Section, page: u64) -> Response {
    let listing = state.recipes().section_posts(section, page).await;
    let emoji = match section {
        Section::Tecniche => "🥄",
        Section::Diario => "📔",
        Section::Ricette => "📖",
    };

    let mut context = tera::Context::new();
    inject_site_context(state, &mut context, section.path());

    let crumbs = breadcrumbs::page(section.label(), section.path(), Some(emoji));
    inject_head(
        state,
        &mut context,
        &state.seo().section(section, page),
        &crumbs,
        Vec::new(),
    );

    context.insert("section", &section);
    context.insert("section_label", section.label());
    context.insert("posts", &RecipeCard::list(&listing.posts, state.images()));
    context.insert("total_count", &listing.total_count);
    context.insert(
        "pagination",
        &listing
            .pagination()
            .navigation(|p| section_href(section.path(), p)),
    );

    render_page(state, "section.html", &context, StatusCode::OK)
}
