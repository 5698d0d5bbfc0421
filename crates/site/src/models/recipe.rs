//! Recipe documents as read from the CMS.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::de;

/// Recipe difficulty.
///
/// Serialized with the values stored in the CMS (`facile`, `media`, `difficile`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "facile")]
    Easy,
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "difficile")]
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Parse a CMS value or query-string alias, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "facile" | "easy" => Some(Difficulty::Easy),
            "media" | "medio" | "medium" => Some(Difficulty::Medium),
            "difficile" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Value stored in the CMS.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "facile",
            Difficulty::Medium => "media",
            Difficulty::Hard => "difficile",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Facile",
            Difficulty::Medium => "Media",
            Difficulty::Hard => "Difficile",
        }
    }

    /// Plural label used in listing titles ("Ricette Facili").
    pub fn plural_label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Facili",
            Difficulty::Medium => "Medie",
            Difficulty::Hard => "Difficili",
        }
    }

    /// Skill level shown under the label.
    pub fn level(self) -> &'static str {
        match self {
            Difficulty::Easy => "Principiante",
            Difficulty::Medium => "Intermedio",
            Difficulty::Hard => "Avanzato",
        }
    }

    /// CSS modifier class for badges.
    pub fn css_class(self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty--easy",
            Difficulty::Medium => "difficulty--medium",
            Difficulty::Hard => "difficulty--hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image field with an asset reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
}

impl ImageRef {
    /// Asset reference id, e.g. `image-abc123-1200x800-jpg`.
    pub fn asset_ref(&self) -> Option<&str> {
        self.asset
            .as_ref()
            .and_then(|a| a.reference.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Alt text, when the author provided a non-blank one.
    pub fn alt_text(&self) -> Option<&str> {
        self.alt.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }
}

/// Reference to an uploaded asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
}

/// Dereferenced category, reduced to its title.
///
/// Accepts both `{ "title": "..." }` and a bare title string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub title: String,
}

impl<'de> Deserialize<'de> for CategoryRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let title = match &value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("title").and_then(Value::as_str),
            _ => None,
        }
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| serde::de::Error::custom("category without title"))?;
        Ok(Self {
            title: title.to_string(),
        })
    }
}

/// Dereferenced author, reduced to its name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub name: String,
}

/// Card-level recipe data used by listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,

    #[serde(deserialize_with = "de::slug")]
    pub slug: String,

    #[serde(default)]
    pub main_image: Option<ImageRef>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<CategoryRef>,

    #[serde(default)]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub author: Option<AuthorRef>,

    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "opt_difficulty")]
    pub difficulty: Option<Difficulty>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub prep_time: Option<u32>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub cook_time: Option<u32>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub servings: Option<u32>,

    #[serde(default)]
    pub rating: Option<f64>,
}

impl RecipeSummary {
    /// Site path of the recipe detail page.
    pub fn path(&self) -> String {
        recipe_path(&self.slug)
    }

    /// Category titles in CMS order.
    pub fn category_titles(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.title.clone()).collect()
    }

    /// Prep plus cook time, only when both are known.
    pub fn total_minutes(&self) -> Option<u32> {
        match (self.prep_time, self.cook_time) {
            (Some(prep), Some(cook)) => Some(prep + cook),
            _ => None,
        }
    }

    /// Trimmed excerpt, if any.
    pub fn excerpt_text(&self) -> Option<&str> {
        self.excerpt
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Author name, if any.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.name.trim())
            .filter(|n| !n.is_empty())
    }
}

/// Site path for a recipe slug.
pub fn recipe_path(slug: &str) -> String {
    format!("/ricette/{}", urlencoding::encode(slug))
}

/// One ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "de::opt_string_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub ingredient: String,
}

impl Ingredient {
    /// Human-readable line: amount, unit, then ingredient.
    pub fn line(&self) -> String {
        let mut parts = Vec::with_capacity(3);
        if let Some(amount) = self.amount.as_deref().filter(|a| !a.is_empty()) {
            parts.push(amount);
        }
        if let Some(unit) = self.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            parts.push(unit);
        }
        parts.push(self.ingredient.trim());
        parts.join(" ")
    }
}

/// One instruction step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub instruction: String,
}

/// Per-recipe SEO overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoOverride {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub no_index: bool,
    #[serde(default)]
    pub canonical_url: Option<String>,
}

/// Full recipe document for the detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(flatten)]
    pub summary: RecipeSummary,

    #[serde(
        rename = "_updatedAt",
        default,
        deserialize_with = "de::lenient_datetime"
    )]
    pub updated_at: Option<DateTime<Utc>>,

    /// Portable Text body.
    #[serde(default)]
    pub body: Option<Value>,

    #[serde(default)]
    pub cake_pan: Option<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<Ingredient>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub instructions: Vec<Instruction>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub tips: Vec<String>,

    #[serde(default, deserialize_with = "de::opt_u32")]
    pub reviews: Option<u32>,

    #[serde(default)]
    pub seo: Option<SeoOverride>,
}

/// Slug and timestamps for one sitemap URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    #[serde(deserialize_with = "de::slug")]
    pub slug: String,

    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,

    #[serde(
        rename = "_updatedAt",
        default,
        deserialize_with = "de::lenient_datetime"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SitemapEntry {
    /// Most recent known modification time.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.published_at)
    }
}

/// Decode an optional list, skipping `null` and malformed elements.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

/// Decode a difficulty leniently; unknown values become `None`.
fn opt_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(Difficulty::parse))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_aliases() {
        assert_eq!(Difficulty::parse("facile"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" Easy "), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("medio"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("MEDIA"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("impossibile"), None);
        assert_eq!(Difficulty::Hard.to_string(), "difficile");
    }

    #[test]
    fn summary_from_projection() {
        let summary: RecipeSummary = serde_json::from_value(json!({
            "_id": "r1",
            "title": "Crostata di frutta",
            "slug": "crostata-di-frutta",
            "categories": [{"title": "Crostate & Pie"}, null, {"title": null}],
            "author": {"name": "Cristian"},
            "publishedAt": "2024-05-01T08:00:00Z",
            "difficulty": "media",
            "prepTime": 40,
            "cookTime": 35,
            "servings": 8,
            "rating": 4.5
        }))
        .unwrap();

        assert_eq!(summary.category_titles(), vec!["Crostate & Pie"]);
        assert_eq!(summary.difficulty, Some(Difficulty::Medium));
        assert_eq!(summary.total_minutes(), Some(75));
        assert_eq!(summary.author_name(), Some("Cristian"));
        assert_eq!(summary.path(), "/ricette/crostata-di-frutta");
    }

    #[test]
    fn summary_requires_slug() {
        let result = serde_json::from_value::<RecipeSummary>(json!({"_id": "r1", "title": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn unknown_difficulty_is_dropped_not_fatal() {
        let summary: RecipeSummary = serde_json::from_value(json!({
            "_id": "r1", "slug": "x", "difficulty": "estrema", "categories": null
        }))
        .unwrap();
        assert!(summary.difficulty.is_none());
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn recipe_detail_fields() {
        let recipe: Recipe = serde_json::from_value(json!({
            "_id": "r2",
            "title": "Tiramisù",
            "slug": {"current": "tiramisu"},
            "_updatedAt": "2024-06-01T12:00:00Z",
            "cakePan": "24x18 cm",
            "ingredients": [
                {"amount": 250, "unit": "g", "ingredient": "Mascarpone"},
                {"ingredient": "Cacao amaro in polvere"},
                null
            ],
            "instructions": [{"instruction": "Montare i tuorli"}],
            "tips": ["Usare uova freschissime", null],
            "seo": {"title": "Tiramisù classico", "keywords": ["tiramisù"], "noIndex": null}
        }))
        .unwrap();

        assert_eq!(recipe.summary.slug, "tiramisu");
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].line(), "250 g Mascarpone");
        assert_eq!(recipe.ingredients[1].line(), "Cacao amaro in polvere");
        assert_eq!(recipe.tips, vec!["Usare uova freschissime"]);
        let seo = recipe.seo.unwrap();
        assert!(!seo.no_index);
        assert_eq!(seo.keywords, vec!["tiramisù"]);
    }

    #[test]
    fn image_ref_accessors() {
        let image: ImageRef = serde_json::from_value(json!({
            "asset": {"_ref": "image-abc-1200x800-jpg"},
            "alt": "  "
        }))
        .unwrap();
        assert_eq!(image.asset_ref(), Some("image-abc-1200x800-jpg"));
        assert_eq!(image.alt_text(), None);
    }
}
