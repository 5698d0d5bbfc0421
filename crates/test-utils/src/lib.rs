//! Pastry site test utilities.
//!
//! Builders for CMS documents shaped like a dataset export: categories,
//! authors and recipes with category references. A [`Dataset`] collects
//! them and renders NDJSON or a document list for the in-memory store.

use serde_json::{Map, Value, json};

/// Create a category document.
pub fn category(id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "_type": "category",
        "title": title,
    })
}

/// Create a recipe with default values.
///
/// The slug is derived from the title; `publishedAt` defaults to the epoch.
pub fn recipe(id: &str, title: &str) -> TestRecipe {
    TestRecipe {
        id: id.to_string(),
        title: title.to_string(),
        slug: Some(slugify(title)),
        published_at: "2024-01-01T00:00:00Z".to_string(),
        category_ids: Vec::new(),
        fields: Map::new(),
    }
}

/// Create an author with default values.
pub fn author(id: &str, name: &str) -> TestAuthor {
    TestAuthor {
        id: id.to_string(),
        name: name.to_string(),
        created_at: "2023-01-01T00:00:00Z".to_string(),
        fields: Map::new(),
    }
}

/// A recipe document builder.
#[derive(Debug, Clone)]
pub struct TestRecipe {
    pub id: String,
    pub title: String,
    pub slug: Option<String>,
    pub published_at: String,
    pub category_ids: Vec<String>,
    pub fields: Map<String, Value>,
}

impl TestRecipe {
    /// Set a custom slug.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    /// Drop the slug; the recipe is then unlisted.
    pub fn without_slug(mut self) -> Self {
        self.slug = None;
        self
    }

    /// Reference a category document by id.
    pub fn in_category(mut self, category_id: &str) -> Self {
        self.category_ids.push(category_id.to_string());
        self
    }

    /// Set `publishedAt` (RFC 3339).
    pub fn published(mut self, at: &str) -> Self {
        self.published_at = at.to_string();
        self
    }

    /// Publish on day `n` of 2024, so higher `n` sorts first.
    pub fn published_day(self, n: u32) -> Self {
        let month = n / 28 + 1;
        let day = n % 28 + 1;
        self.published(&format!("2024-{month:02}-{day:02}T09:00:00Z"))
    }

    pub fn with_difficulty(self, difficulty: &str) -> Self {
        self.with_field("difficulty", json!(difficulty))
    }

    pub fn with_excerpt(self, excerpt: &str) -> Self {
        self.with_field("excerpt", json!(excerpt))
    }

    /// Prep and cook minutes.
    pub fn with_times(self, prep: u32, cook: u32) -> Self {
        self.with_field("prepTime", json!(prep))
            .with_field("cookTime", json!(cook))
    }

    /// One paragraph of Portable Text body.
    pub fn with_body_text(self, text: &str) -> Self {
        self.with_field("body", json!([text_block(text)]))
    }

    /// Main image from an asset reference such as `image-abc-800x600-jpg`.
    pub fn with_image(self, asset_ref: &str, alt: &str) -> Self {
        self.with_field(
            "mainImage",
            json!({ "_type": "image", "asset": { "_ref": asset_ref }, "alt": alt }),
        )
    }

    /// Ingredient lines as `(amount, unit, ingredient)`.
    pub fn with_ingredients(self, lines: &[(&str, &str, &str)]) -> Self {
        let items: Vec<Value> = lines
            .iter()
            .map(|(amount, unit, ingredient)| {
                json!({ "amount": amount, "unit": unit, "ingredient": ingredient })
            })
            .collect();
        self.with_field("ingredients", Value::Array(items))
    }

    pub fn with_instructions(self, steps: &[&str]) -> Self {
        let items: Vec<Value> = steps.iter().map(|s| json!({ "instruction": s })).collect();
        self.with_field("instructions", Value::Array(items))
    }

    /// Reference an author document by id.
    pub fn by_author(self, author_id: &str) -> Self {
        self.with_field("author", json!({ "_type": "reference", "_ref": author_id }))
    }

    /// Set an arbitrary document field.
    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Build the document.
    pub fn build(&self) -> Value {
        let mut doc = self.fields.clone();
        doc.insert("_id".into(), json!(self.id));
        doc.insert("_type".into(), json!("recipe"));
        doc.insert("title".into(), json!(self.title));
        doc.insert("publishedAt".into(), json!(self.published_at));
        doc.insert("_createdAt".into(), json!(self.published_at));
        doc.insert("_updatedAt".into(), json!(self.published_at));
        if let Some(slug) = &self.slug {
            doc.insert("slug".into(), json!({ "_type": "slug", "current": slug }));
        }
        let refs: Vec<Value> = self
            .category_ids
            .iter()
            .enumerate()
            .map(|(i, id)| json!({ "_key": format!("c{i}"), "_type": "reference", "_ref": id }))
            .collect();
        doc.insert("categories".into(), Value::Array(refs));
        Value::Object(doc)
    }
}

/// An author document builder.
#[derive(Debug, Clone)]
pub struct TestAuthor {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub fields: Map<String, Value>,
}

impl TestAuthor {
    pub fn created(mut self, at: &str) -> Self {
        self.created_at = at.to_string();
        self
    }

    pub fn with_bio(self, text: &str) -> Self {
        self.with_field("bio", json!([text_block(text)]))
    }

    pub fn with_quote(self, quote: &str) -> Self {
        self.with_field("quote", json!(quote))
    }

    pub fn with_field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    pub fn build(&self) -> Value {
        let mut doc = self.fields.clone();
        doc.insert("_id".into(), json!(self.id));
        doc.insert("_type".into(), json!("author"));
        doc.insert("name".into(), json!(self.name));
        doc.insert("_createdAt".into(), json!(self.created_at));
        Value::Object(doc)
    }
}

/// A Portable Text block with a single span.
pub fn text_block(text: &str) -> Value {
    json!({
        "_type": "block",
        "style": "normal",
        "markDefs": [],
        "children": [{ "_type": "span", "text": text, "marks": [] }],
    })
}

/// Collected documents, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    documents: Vec<Value>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, id: &str, title: &str) -> Self {
        self.documents.push(category(id, title));
        self
    }

    pub fn with_recipe(mut self, recipe: TestRecipe) -> Self {
        self.documents.push(recipe.build());
        self
    }

    pub fn with_author(mut self, author: TestAuthor) -> Self {
        self.documents.push(author.build());
        self
    }

    /// Add a raw document.
    pub fn with_document(mut self, doc: Value) -> Self {
        self.documents.push(doc);
        self
    }

    pub fn documents(&self) -> &[Value] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<Value> {
        self.documents
    }

    /// One JSON document per line, as in a dataset export.
    pub fn to_ndjson(&self) -> String {
        self.documents
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A small bakery: the Biscotti category with `biscotti` recipes, a Torte moderne
/// category with `others` recipes, plus one technique and one diary post.
///
/// Recipes are published on distinct days, newest last added.
pub fn bakery(biscotti: usize, others: usize) -> Dataset {
    let mut data = Dataset::new()
        .with_category("cat-biscotti", "Biscotti")
        .with_category("cat-torte", "Torte moderne")
        .with_category("cat-tecniche", "Tecniche")
        .with_category("cat-diario", "Diario")
        .with_author(
            author("author-cristian", "Cristian")
                .with_quote("La pasticceria è precisione e cuore.")
                .with_bio("Pasticcere per passione."),
        );

    let mut day = 0u32;
    for i in 0..biscotti {
        day += 1;
        let difficulty = if i % 2 == 0 { "facile" } else { "media" };
        data = data.with_recipe(
            recipe(&format!("biscotto-{i}"), &format!("Biscotti al burro {i}"))
                .in_category("cat-biscotti")
                .with_difficulty(difficulty)
                .with_excerpt("Friabili e profumati")
                .by_author("author-cristian")
                .published_day(day),
        );
    }
    for i in 0..others {
        day += 1;
        data = data.with_recipe(
            recipe(&format!("torta-{i}"), &format!("Torta margherita {i}"))
                .in_category("cat-torte")
                .with_difficulty("difficile")
                .with_excerpt("Soffice e alta")
                .by_author("author-cristian")
                .published_day(day),
        );
    }
    data.with_recipe(
        recipe("tecnica-1", "Temperaggio del cioccolato")
            .in_category("cat-tecniche")
            .published_day(day + 1),
    )
    .with_recipe(
        recipe("diario-1", "Il primo giorno in laboratorio")
            .in_category("cat-diario")
            .published_day(day + 2),
    )
}

/// Lowercase ASCII slug with dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Assertion helpers.
pub mod assert {
    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}
