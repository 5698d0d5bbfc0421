//! Breadcrumb trails.

use serde::Serialize;

use super::metadata::capitalize;
use crate::cms::RecipeFilter;
use crate::listing::listing_href;

/// One breadcrumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub href: String,
    pub emoji: &'static str,
    pub current: bool,
}

impl Breadcrumb {
    fn new(label: impl Into<String>, href: impl Into<String>, emoji: &'static str) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            emoji,
            current: false,
        }
    }

    fn current(mut self) -> Self {
        self.current = true;
        self
    }
}

fn home() -> Breadcrumb {
    Breadcrumb::new("Home", "/", "🏠")
}

/// Home → Ricette → active filter.
///
/// Only one filter crumb is shown: category, else difficulty, else query.
pub fn recipe_listing(filter: &RecipeFilter) -> Vec<Breadcrumb> {
    let recipes = Breadcrumb::new("Ricette", "/ricette", "📖");

    let filter_crumb = if let Some(category) = filter.category() {
        Some(Breadcrumb::new(
            capitalize(category),
            listing_href(&RecipeFilter::default().with_category(category), 1),
            "🍰",
        ))
    } else if let Some(difficulty) = filter.difficulty() {
        Some(Breadcrumb::new(
            format!("Difficoltà {}", difficulty.label()),
            listing_href(&RecipeFilter::default().with_difficulty(difficulty), 1),
            "📊",
        ))
    } else {
        filter.query().map(|q| {
            Breadcrumb::new(
                format!("Ricerca: \"{q}\""),
                listing_href(&RecipeFilter::default().with_query(q), 1),
                "🔍",
            )
        })
    };

    match filter_crumb {
        Some(crumb) => vec![home(), recipes, crumb.current()],
        None => vec![home(), recipes.current()],
    }
}

/// Home → Ricette → recipe title.
pub fn recipe_detail(title: &str, path: &str) -> Vec<Breadcrumb> {
    vec![
        home(),
        Breadcrumb::new("Ricette", "/ricette", "📖"),
        Breadcrumb::new(title, path, "🍰").current(),
    ]
}

/// Home → page, for two-level pages.
pub fn page(label: &str, href: &str, emoji: Option<&'static str>) -> Vec<Breadcrumb> {
    vec![
        home(),
        Breadcrumb::new(label, href, emoji.unwrap_or("📄")).current(),
    ]
}
