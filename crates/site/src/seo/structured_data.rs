//! JSON-LD structured data (schema.org).
//!
//! Every builder is a pure function of already-fetched entities.

use serde_json::{Map, Value, json};

use super::breadcrumbs::Breadcrumb;
use super::metadata::{SeoBuilder, capitalize, recipe_title};
use crate::cms::RecipeFilter;
use crate::content::portable_text;
use crate::listing::{RecipeListing, listing_href};
use crate::models::{Author, Recipe, RecipeSummary};
use crate::site;

/// Image variants listed for rich results.
const RECIPE_IMAGE_SIZES: [(u32, u32); 3] = [(1200, 630), (800, 600), (480, 360)];

/// Items embedded in a CollectionPage.
const COLLECTION_ITEMS: usize = 10;

/// ISO-8601 duration in minutes.
pub fn duration(minutes: u32) -> String {
    format!("PT{minutes}M")
}

fn aggregate_rating(rating: f64, count: u32) -> Value {
    json!({
        "@type": "AggregateRating",
        "ratingValue": rating,
        "ratingCount": count,
        "bestRating": 5,
        "worstRating": 1
    })
}

/// Recipe schema for a detail page.
pub fn recipe(seo: &SeoBuilder, recipe: &Recipe) -> Value {
    let summary = &recipe.summary;
    let override_block = recipe.seo.as_ref();
    let meta = seo.recipe(recipe);

    let mut ld = Map::new();
    ld.insert("@context".into(), json!("https://schema.org"));
    ld.insert("@type".into(), json!("Recipe"));
    ld.insert("name".into(), json!(recipe_title(recipe)));
    ld.insert("description".into(), json!(meta.description));
    ld.insert("url".into(), json!(meta.canonical));

    let image = override_block
        .and_then(|s| s.image.as_ref())
        .filter(|i| i.asset_ref().is_some())
        .or(summary.main_image.as_ref());
    if let Some(image) = image {
        let urls: Vec<String> = RECIPE_IMAGE_SIZES
            .iter()
            .filter_map(|(w, h)| seo.images().cropped(image, *w, *h))
            .collect();
        if !urls.is_empty() {
            ld.insert("image".into(), json!(urls));
        }
    }

    if let Some(name) = summary.author_name() {
        ld.insert("author".into(), json!({ "@type": "Person", "name": name }));
    }
    if let Some(published) = summary.published_at {
        ld.insert("datePublished".into(), json!(published.to_rfc3339()));
    }
    if let Some(updated) = recipe.updated_at {
        ld.insert("dateModified".into(), json!(updated.to_rfc3339()));
    }
    if let Some(prep) = summary.prep_time {
        ld.insert("prepTime".into(), json!(duration(prep)));
    }
    if let Some(cook) = summary.cook_time {
        ld.insert("cookTime".into(), json!(duration(cook)));
    }
    if let Some(total) = summary.total_minutes() {
        ld.insert("totalTime".into(), json!(duration(total)));
    }
    if let Some(servings) = summary.servings {
        ld.insert("recipeYield".into(), json!(servings.to_string()));
    }

    let categories = summary.category_titles();
    if !categories.is_empty() {
        ld.insert("recipeCategory".into(), json!(categories));
    }
    if !recipe.ingredients.is_empty() {
        let lines: Vec<String> = recipe.ingredients.iter().map(|i| i.line()).collect();
        ld.insert("recipeIngredient".into(), json!(lines));
    }
    if !recipe.instructions.is_empty() {
        let steps: Vec<Value> = recipe
            .instructions
            .iter()
            .enumerate()
            .map(|(index, step)| {
                json!({
                    "@type": "HowToStep",
                    "position": index + 1,
                    "text": step.instruction
                })
            })
            .collect();
        ld.insert("recipeInstructions".into(), Value::Array(steps));
    }
    if let Some(rating) = summary.rating.filter(|r| *r > 0.0) {
        let count = recipe.reviews.filter(|n| *n > 0).unwrap_or(1);
        ld.insert("aggregateRating".into(), aggregate_rating(rating, count));
    }
    if !meta.keywords.is_empty() {
        ld.insert("keywords".into(), json!(meta.keywords.join(", ")));
    }

    Value::Object(ld)
}

/// Compact Recipe entry embedded in a collection.
fn collection_item(seo: &SeoBuilder, recipe: &RecipeSummary) -> Value {
    let mut item = Map::new();
    item.insert("@type".into(), json!("Recipe"));
    let name = if recipe.title.trim().is_empty() {
        "Ricetta"
    } else {
        recipe.title.trim()
    };
    item.insert("name".into(), json!(name));
    item.insert("url".into(), json!(seo.absolute(&recipe.path())));
    if let Some(url) = recipe
        .main_image
        .as_ref()
        .and_then(|img| seo.images().cropped(img, 400, 300))
    {
        item.insert("image".into(), json!(url));
    }
    if let Some(excerpt) = recipe.excerpt_text() {
        item.insert("description".into(), json!(excerpt));
    }
    if let Some(category) = recipe.categories.first() {
        item.insert("recipeCategory".into(), json!(category.title));
    }
    if let Some(prep) = recipe.prep_time {
        item.insert("prepTime".into(), json!(duration(prep)));
    }
    if let Some(cook) = recipe.cook_time {
        item.insert("cookTime".into(), json!(duration(cook)));
    }
    if let Some(total) = recipe.total_minutes() {
        item.insert("totalTime".into(), json!(duration(total)));
    }
    if let Some(servings) = recipe.servings {
        item.insert("recipeYield".into(), json!(servings.to_string()));
    }
    item.insert(
        "author".into(),
        json!({
            "@type": "Person",
            "name": recipe.author_name().unwrap_or(site::OWNER_NAME)
        }),
    );
    if let Some(rating) = recipe.rating.filter(|r| *r > 0.0) {
        item.insert("aggregateRating".into(), aggregate_rating(rating, 1));
    }
    Value::Object(item)
}

/// CollectionPage for a recipe listing.
pub fn collection_page(seo: &SeoBuilder, filter: &RecipeFilter, listing: &RecipeListing) -> Value {
    let (name, description) = match filter.category() {
        Some(category) => (
            format!("Ricette {} - {}", capitalize(category), site::SITE_NAME),
            format!(
                "Collezione di {} ricette di {category}",
                listing.total_count
            ),
        ),
        None => (
            format!("Ricette di Pasticceria - {}", site::SITE_NAME),
            "Collezione completa di ricette di pasticceria moderna italiana".to_string(),
        ),
    };

    let parts: Vec<Value> = listing
        .recipes
        .iter()
        .take(COLLECTION_ITEMS)
        .map(|r| collection_item(seo, r))
        .collect();

    let about: Vec<Value> = listing
        .categories
        .iter()
        .map(|c| {
            json!({
                "@type": "Thing",
                "name": c.title,
                "url": seo.absolute(&listing_href(
                    &RecipeFilter::default().with_category(&c.param_value()),
                    1
                ))
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org",
        "@type": "CollectionPage",
        "name": name,
        "description": description,
        "url": seo.absolute(&listing_href(filter, 1)),
        "inLanguage": site::LANGUAGE,
        "numberOfItems": listing.total_count,
        "hasPart": parts,
        "author": {
            "@type": "Person",
            "name": site::OWNER_NAME,
            "url": seo.absolute("/chi-sono")
        },
        "publisher": {
            "@type": "Organization",
            "name": site::SITE_NAME,
            "url": seo.site_url()
        },
        "about": about
    })
}

/// BreadcrumbList for a trail.
pub fn breadcrumb_list(seo: &SeoBuilder, crumbs: &[Breadcrumb]) -> Value {
    let items: Vec<Value> = crumbs
        .iter()
        .enumerate()
        .map(|(index, crumb)| {
            json!({
                "@type": "ListItem",
                "position": index + 1,
                "name": crumb.label,
                "item": seo.absolute(&crumb.href)
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": items
    })
}

/// Person schema for the about page.
pub fn person(seo: &SeoBuilder, author: &Author) -> Value {
    let mut ld = Map::new();
    ld.insert("@context".into(), json!("https://schema.org"));
    ld.insert("@type".into(), json!("Person"));
    ld.insert("name".into(), json!(author.display_name()));
    ld.insert("url".into(), json!(seo.absolute("/chi-sono")));
    ld.insert("jobTitle".into(), json!("Pasticcere"));

    if let Some(image) = author.image.as_ref().and_then(|i| seo.images().cropped(i, 400, 400)) {
        ld.insert("image".into(), json!(image));
    }
    if let Some(bio) = author.bio.as_ref().map(portable_text::plain_text) {
        if !bio.is_empty() {
            ld.insert("description".into(), json!(bio));
        }
    }
    if let Some(location) = author.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        ld.insert(
            "address".into(),
            json!({ "@type": "PostalAddress", "addressLocality": location }),
        );
    }
    let same_as: Vec<&str> = author
        .social
        .iter()
        .map(|s| s.url.trim())
        .filter(|u| !u.is_empty())
        .collect();
    if !same_as.is_empty() {
        ld.insert("sameAs".into(), json!(same_as));
    }
    Value::Object(ld)
}

/// Serialize for embedding in a `<script type="application/ld+json">` element.
///
/// `</` is escaped so string content cannot close the script element.
pub fn to_script_json(value: &Value) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "{}".to_string())
        .replace("</", "<\\/")
}
