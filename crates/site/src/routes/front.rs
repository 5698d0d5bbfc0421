//! Home page.

use axum::{Router, extract::State, http::StatusCode, response::Response, routing::get};

use crate::seo::structured_data;
use crate::state::AppState;
use crate::theme::view::{AuthorView, RecipeCard};

use super::helpers::{inject_head, inject_site_context, render_page};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(home_page))
}

/// Latest recipes, author teaser, latest diary entries and techniques.
async fn home_page(State(state): State<AppState>) -> Response {
    let home = state.recipes().home().await;
    let images = state.images();

    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, "/");

    let json_ld = home
        .author
        .as_ref()
        .map(|a| structured_data::person(state.seo(), a))
        .into_iter()
        .collect();
    inject_head(&state, &mut context, &state.seo().home(), &[], json_ld);

    context.insert("recent_recipes", &RecipeCard::list(&home.recent_recipes, images));
    context.insert("recent_diary", &RecipeCard::list(&home.recent_diary, images));
    context.insert(
        "recent_techniques",
        &RecipeCard::list(&home.recent_techniques, images),
    );
    context.insert(
        "author",
        &home.author.as_ref().map(|a| AuthorView::new(a, images)),
    );

    render_page(&state, "home.html", &context, StatusCode::OK)
}
