//! Recipe listing and recipe detail pages.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::get,
};

use crate::listing::listing_href;
use crate::models::{Difficulty, ListingQuery, recipe_path};
use crate::seo::{breadcrumbs, structured_data};
use crate::state::AppState;
use crate::theme::view::{
    ActiveFilter, RecipeCard, RecipeView, category_chips, difficulty_chips,
};

use super::extract::LenientQuery;
use super::helpers::{inject_head, inject_site_context, not_found_page, render_page};

/// Related recipes shown under a recipe.
const RELATED_LIMIT: u64 = 3;

/// Latest recipes shown in the sidebar.
const SIDEBAR_LIMIT: u64 = 4;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ricette", get(recipe_listing))
        .route("/ricette/{slug}", get(recipe_detail))
}

/// `/ricette?categoria=&difficolta=&q=&page=`
async fn recipe_listing(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<ListingQuery>,
) -> Response {
    let filter = query.filter();
    let page = query.page();
    let listing = state.recipes().list_recipes(&filter, page).await;
    let pagination = listing.pagination();

    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, "/ricette");

    let crumbs = breadcrumbs::recipe_listing(&filter);
    let meta = state.seo().listing(&filter, page, listing.total_count);
    let collection = structured_data::collection_page(state.seo(), &filter, &listing);
    inject_head(&state, &mut context, &meta, &crumbs, vec![collection]);

    context.insert("recipes", &RecipeCard::list(&listing.recipes, state.images()));
    context.insert("total_count", &listing.total_count);
    context.insert("current_page", &listing.current_page);
    context.insert("total_pages", &listing.total_pages);
    context.insert(
        "category_chips",
        &category_chips(&listing.categories, &filter, listing.total_count),
    );
    context.insert("difficulty_chips", &difficulty_chips(&filter));
    context.insert("difficulties", &Difficulty::ALL.map(|d| (d.as_str(), d.label())));
    context.insert("filter", &ActiveFilter::from(&filter));
    context.insert(
        "pagination",
        &pagination.navigation(|p| listing_href(&filter, p)),
    );

    render_page(&state, "recipes.html", &context, StatusCode::OK)
}

/// `/ricette/{slug}`; 404 for unknown slugs.
async fn recipe_detail(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let path = recipe_path(&slug);
    let Some(recipe) = state.recipes().recipe_by_slug(&slug).await else {
        return not_found_page(&state, &path);
    };

    let (related, latest) = tokio::join!(
        state.recipes().related_recipes(&recipe.summary, RELATED_LIMIT),
        state.recipes().other_recipes(&recipe.summary.slug, SIDEBAR_LIMIT),
    );

    let images = state.images();
    let view = RecipeView::new(&recipe, images);

    let mut context = tera::Context::new();
    inject_site_context(&state, &mut context, &path);

    let crumbs = breadcrumbs::recipe_detail(&view.title, &recipe.summary.path());
    let meta = state.seo().recipe(&recipe);
    let json_ld = vec![structured_data::recipe(state.seo(), &recipe)];
    inject_head(&state, &mut context, &meta, &crumbs, json_ld);

    context.insert("recipe", &view);
    context.insert("related", &RecipeCard::list(&related, images));
    context.insert("latest", &RecipeCard::list(&latest, images));

    render_page(&state, "recipe.html", &context, StatusCode::OK)
}
