//! View models passed to templates.

use serde::Serialize;

use crate::cms::{ImageUrlBuilder, RecipeFilter, fold_title};
use crate::content::portable_text;
use crate::listing::listing_href;
use crate::models::{Author, CategoryFacet, Difficulty, Recipe, RecipeSummary};
use crate::seo::metadata::recipe_title;

const CARD_IMAGE: (u32, u32) = (600, 450);
const HERO_IMAGE: (u32, u32) = (1200, 800);
const PORTRAIT_IMAGE: (u32, u32) = (480, 480);

/// Difficulty badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyBadge {
    pub value: &'static str,
    pub label: &'static str,
    pub level: &'static str,
    pub class: &'static str,
}

impl From<Difficulty> for DifficultyBadge {
    fn from(d: Difficulty) -> Self {
        Self {
            value: d.as_str(),
            label: d.label(),
            level: d.level(),
            class: d.css_class(),
        }
    }
}

/// Listing card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCard {
    pub title: String,
    pub href: String,
    pub image: Option<String>,
    pub image_alt: String,
    pub excerpt: Option<String>,
    pub categories: Vec<String>,
    pub difficulty: Option<DifficultyBadge>,
    pub total_minutes: Option<u32>,
    pub published_at: Option<String>,
    pub author: Option<String>,
}

impl RecipeCard {
    pub fn new(recipe: &RecipeSummary, images: &ImageUrlBuilder) -> Self {
        let title = display_title(&recipe.title);
        let image = recipe
            .main_image
            .as_ref()
            .and_then(|img| images.cropped(img, CARD_IMAGE.0, CARD_IMAGE.1));
        let image_alt = recipe
            .main_image
            .as_ref()
            .and_then(|img| img.alt_text())
            .unwrap_or(&title)
            .to_string();
        Self {
            href: recipe.path(),
            image,
            image_alt,
            excerpt: recipe.excerpt_text().map(str::to_string),
            categories: recipe.category_titles(),
            difficulty: recipe.difficulty.map(DifficultyBadge::from),
            total_minutes: recipe
                .total_minutes()
                .or(recipe.prep_time)
                .or(recipe.cook_time),
            published_at: recipe.published_at.map(|d| d.to_rfc3339()),
            author: recipe.author_name().map(str::to_string),
            title,
        }
    }

    pub fn list(recipes: &[RecipeSummary], images: &ImageUrlBuilder) -> Vec<Self> {
        recipes.iter().map(|r| Self::new(r, images)).collect()
    }
}

/// Recipe detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeView {
    pub title: String,
    pub excerpt: Option<String>,
    pub hero_image: Option<String>,
    pub hero_alt: String,
    pub body_html: String,
    pub categories: Vec<String>,
    pub difficulty: Option<DifficultyBadge>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub total_time: Option<u32>,
    pub servings: Option<u32>,
    pub cake_pan: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub author: Option<String>,
    pub published_at: Option<String>,
}

impl RecipeView {
    pub fn new(recipe: &Recipe, images: &ImageUrlBuilder) -> Self {
        let summary = &recipe.summary;
        let title = recipe_title(recipe);
        let hero_image = summary
            .main_image
            .as_ref()
            .and_then(|img| images.cropped(img, HERO_IMAGE.0, HERO_IMAGE.1));
        let hero_alt = summary
            .main_image
            .as_ref()
            .and_then(|img| img.alt_text())
            .unwrap_or(&title)
            .to_string();
        Self {
            excerpt: summary.excerpt_text().map(str::to_string),
            hero_image,
            hero_alt,
            body_html: recipe
                .body
                .as_ref()
                .map(|b| portable_text::render_html(b, Some(images)))
                .unwrap_or_default(),
            categories: summary.category_titles(),
            difficulty: summary.difficulty.map(DifficultyBadge::from),
            prep_time: summary.prep_time,
            cook_time: summary.cook_time,
            total_time: summary.total_minutes(),
            servings: summary.servings,
            cake_pan: recipe
                .cake_pan
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            ingredients: recipe.ingredients.iter().map(|i| i.line()).collect(),
            instructions: recipe
                .instructions
                .iter()
                .map(|s| s.instruction.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            tips: recipe
                .tips
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            rating: summary.rating,
            reviews: recipe.reviews,
            author: summary.author_name().map(str::to_string),
            published_at: summary.published_at.map(|d| d.to_rfc3339()),
            title,
        }
    }
}

/// Author profile for the about and home pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub name: String,
    pub image: Option<String>,
    pub bio_html: String,
    pub story_html: String,
    pub quote: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub recipes_count: Option<u32>,
    pub philosophy: Vec<crate::models::PhilosophyItem>,
    pub social: Vec<crate::models::SocialLink>,
}

impl AuthorView {
    pub fn new(author: &Author, images: &ImageUrlBuilder) -> Self {
        let rich = |value: &Option<serde_json::Value>| {
            value
                .as_ref()
                .map(|v| portable_text::render_html(v, Some(images)))
                .unwrap_or_default()
        };
        Self {
            name: author.display_name().to_string(),
            image: author
                .image
                .as_ref()
                .and_then(|img| images.cropped(img, PORTRAIT_IMAGE.0, PORTRAIT_IMAGE.1)),
            bio_html: rich(&author.bio),
            story_html: rich(&author.story),
            quote: author.quote.clone(),
            experience: author.experience.clone(),
            location: author.location.clone(),
            recipes_count: author.recipes_count,
            philosophy: author
                .philosophy
                .iter()
                .filter(|p| !p.title.trim().is_empty())
                .cloned()
                .collect(),
            social: author
                .social
                .iter()
                .filter(|s| s.url.starts_with("https://") || s.url.starts_with("http://"))
                .cloned()
                .collect(),
        }
    }
}

/// Filter chip linking to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub label: String,
    pub href: String,
    pub count: Option<u64>,
    pub active: bool,
}

/// Category chips: "Tutte" first, then each facet.
///
/// Chips keep the active difficulty and query and reset pagination.
pub fn category_chips(facets: &[CategoryFacet], filter: &RecipeFilter, total: u64) -> Vec<FilterChip> {
    let base = RecipeFilter::default();
    let base = match filter.difficulty() {
        Some(d) => base.with_difficulty(d),
        None => base,
    };
    let base = match filter.query() {
        Some(q) => base.with_query(q),
        None => base,
    };

    let active_category = filter.category().map(fold_title);
    let mut chips = vec![FilterChip {
        label: "Tutte".to_string(),
        href: listing_href(&base, 1),
        count: filter.category().is_none().then_some(total),
        active: active_category.is_none(),
    }];
    chips.extend(facets.iter().map(|facet| FilterChip {
        label: facet.title.clone(),
        href: listing_href(&base.clone().with_category(&facet.param_value()), 1),
        count: (facet.count > 0).then_some(facet.count),
        active: active_category.as_deref() == Some(facet.param_value().as_str()),
    }));
    chips
}

/// Difficulty chips; keep the active category and query.
pub fn difficulty_chips(filter: &RecipeFilter) -> Vec<FilterChip> {
    let mut base = RecipeFilter::default();
    if let Some(c) = filter.category() {
        base = base.with_category(c);
    }
    if let Some(q) = filter.query() {
        base = base.with_query(q);
    }
    Difficulty::ALL
        .iter()
        .map(|d| FilterChip {
            label: d.label().to_string(),
            href: listing_href(&base.clone().with_difficulty(*d), 1),
            count: None,
            active: filter.difficulty() == Some(*d),
        })
        .collect()
}

/// Active filter values echoed back into the listing form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub category: Option<String>,
    pub difficulty: Option<&'static str>,
    pub query: Option<String>,
    pub any: bool,
}

impl From<&RecipeFilter> for ActiveFilter {
    fn from(filter: &RecipeFilter) -> Self {
        Self {
            category: filter.category().map(str::to_string),
            difficulty: filter.difficulty().map(Difficulty::as_str),
            query: filter.query().map(str::to_string),
            any: !filter.is_empty(),
        }
    }
}

fn display_title(title: &str) -> String {
    let title = title.trim();
    if title.is_empty() {
        "Ricetta".to_string()
    } else {
        title.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new("p1", "production")
    }

    #[test]
    fn card_from_sparse_summary() {
        let summary: RecipeSummary = serde_json::from_value(json!({
            "_id": "r1", "slug": "bigne", "title": null, "prepTime": 20,
            "mainImage": {"asset": {"_ref": "not-an-image"}}
        }))
        .unwrap();
        let card = RecipeCard::new(&summary, &images());
        assert_eq!(card.title, "Ricetta");
        assert_eq!(card.href, "/ricette/bigne");
        assert!(card.image.is_none());
        assert_eq!(card.total_minutes, Some(20));
    }

    #[test]
    fn category_chips_mark_active() {
        let facets = vec![
            CategoryFacet { title: "Biscotti".into(), count: 5 },
            CategoryFacet { title: "Cioccolato".into(), count: 0 },
        ];
        let filter = RecipeFilter::new(Some("BISCOTTI"), Some("facile"), None);
        let chips = category_chips(&facets, &filter, 5);

        assert_eq!(chips.len(), 3);
        assert!(!chips[0].active);
        assert_eq!(chips[0].href, "/ricette?difficolta=facile");
        assert!(chips[1].active);
        assert_eq!(chips[1].count, Some(5));
        assert_eq!(chips[1].href, "/ricette?categoria=biscotti&difficolta=facile");
        assert_eq!(chips[2].count, None);
    }

    #[test]
    fn difficulty_chips_keep_category() {
        let filter = RecipeFilter::new(Some("Biscotti"), Some("media"), None);
        let chips = difficulty_chips(&filter);
        assert_eq!(chips.len(), 3);
        assert!(chips[1].active);
        assert_eq!(chips[0].href, "/ricette?categoria=Biscotti&difficolta=facile");
    }

    #[test]
    fn recipe_view_renders_body() {
        let recipe: Recipe = serde_json::from_value(json!({
            "_id": "r1", "slug": "s", "title": "Sbrisolona",
            "cakePan": "  ",
            "body": [{"_type": "block", "children": [{"_type": "span", "text": "Croccante"}]}],
            "tips": ["", "Servire tiepida"]
        }))
        .unwrap();
        let view = RecipeView::new(&recipe, &images());
        assert_eq!(view.body_html, "<p>Croccante</p>");
        assert_eq!(view.cake_pan, None);
        assert_eq!(view.tips, vec!["Servire tiepida"]);
    }
}
