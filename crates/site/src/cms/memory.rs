//! In-memory content store over an NDJSON dataset export.
//!
//! Evaluates every [`ContentQuery`] natively against the exported documents,
//! producing the same result shapes as the GROQ projections. Used for local
//! development without network access and as the test backend.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::info;

use super::groq::{HOME_RECENT_POSTS, HOME_RECENT_RECIPES, SEARCH_LIMIT};
use super::{CmsError, ContentQuery, ContentStore, RecipeFilter, titles_match};
use crate::classify::Section;
use crate::content::portable_text;

/// Fields copied verbatim into every recipe summary.
const SUMMARY_FIELDS: &[&str] = &[
    "_id",
    "title",
    "mainImage",
    "excerpt",
    "publishedAt",
    "difficulty",
    "prepTime",
    "cookTime",
    "servings",
    "rating",
];

/// Extra fields copied into the detail projection.
const DETAIL_FIELDS: &[&str] = &[
    "_updatedAt",
    "reviews",
    "cakePan",
    "body",
    "ingredients",
    "instructions",
    "tips",
    "seo",
];

const AUTHOR_FIELDS: &[&str] = &[
    "_id",
    "name",
    "image",
    "bio",
    "quote",
    "experience",
    "recipesCount",
    "location",
    "social",
    "philosophy",
    "story",
];

/// Content store holding published documents in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Vec<Value>,
    by_id: HashMap<String, usize>,
}

impl MemoryStore {
    /// Build a store from raw documents.
    ///
    /// Drafts (`drafts.*` ids) and entries without an `_id` are skipped.
    pub fn new(documents: impl IntoIterator<Item = Value>) -> Self {
        let mut store = Self::default();
        for doc in documents {
            let Some(id) = doc.get("_id").and_then(Value::as_str).map(str::to_string) else {
                continue;
            };
            if id.starts_with("drafts.") {
                continue;
            }
            store.by_id.insert(id, store.documents.len());
            store.documents.push(doc);
        }
        store
    }

    /// Parse an NDJSON export, one document per line.
    pub fn from_ndjson(text: &str) -> Result<Self, CmsError> {
        let mut documents = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let doc: Value = serde_json::from_str(line)
                .map_err(|e| CmsError::Fixture(format!("line {}: {e}", index + 1)))?;
            documents.push(doc);
        }
        Ok(Self::new(documents))
    }

    /// Load an NDJSON export from disk.
    pub async fn load(path: &Path) -> Result<Self, CmsError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CmsError::Fixture(format!("{}: {e}", path.display())))?;
        let store = Self::from_ndjson(&text)?;
        info!(
            path = %path.display(),
            documents = store.len(),
            "loaded content fixture"
        );
        Ok(store)
    }

    /// Number of published documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn get(&self, id: &str) -> Option<&Value> {
        self.by_id.get(id).map(|&i| &self.documents[i])
    }

    fn of_type<'a>(&'a self, doc_type: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.documents
            .iter()
            .filter(move |d| d.get("_type").and_then(Value::as_str) == Some(doc_type))
    }

    /// Published recipes with a defined slug.
    fn recipes(&self) -> impl Iterator<Item = &Value> {
        self.of_type("recipe").filter(|d| slug_of(d).is_some())
    }

    /// Dereferenced category title per reference; `None` for dangling ones.
    fn category_refs(&self, doc: &Value) -> Vec<Option<String>> {
        doc.get("categories")
            .and_then(Value::as_array)
            .map(|refs| {
                refs.iter()
                    .map(|r| {
                        let target = match r.get("_ref").and_then(Value::as_str) {
                            Some(id) => self.get(id)?,
                            None => r,
                        };
                        target
                            .get("title")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn category_titles(&self, doc: &Value) -> Vec<String> {
        self.category_refs(doc).into_iter().flatten().collect()
    }

    fn references(doc: &Value, id: &str) -> bool {
        doc.get("categories")
            .and_then(Value::as_array)
            .is_some_and(|refs| {
                refs.iter()
                    .any(|r| r.get("_ref").and_then(Value::as_str) == Some(id))
            })
    }

    fn matches(&self, filter: &RecipeFilter, doc: &Value) -> bool {
        if let Some(category) = filter.category() {
            if !self
                .category_titles(doc)
                .iter()
                .any(|t| titles_match(t, category))
            {
                return false;
            }
        }
        if let Some(difficulty) = filter.difficulty() {
            if doc.get("difficulty").and_then(Value::as_str) != Some(difficulty.as_str()) {
                return false;
            }
        }
        if let Some(query) = filter.query() {
            let needle = query.to_lowercase();
            if !(contains(doc, "title", &needle) || contains(doc, "excerpt", &needle)) {
                return false;
            }
        }
        true
    }

    fn filtered(&self, filter: &RecipeFilter) -> Vec<&Value> {
        let mut recipes: Vec<&Value> = self.recipes().filter(|d| self.matches(filter, d)).collect();
        recipes.sort_by(|a, b| newest_first(a, b, "publishedAt"));
        recipes
    }

    fn in_category(&self, category: &str) -> Vec<&Value> {
        let mut recipes: Vec<&Value> = self
            .recipes()
            .filter(|d| self.category_titles(d).iter().any(|t| t == category))
            .collect();
        recipes.sort_by(|a, b| newest_first(a, b, "publishedAt"));
        recipes
    }

    fn summary(&self, doc: &Value) -> Value {
        let mut out = pick(doc, SUMMARY_FIELDS);
        out.insert("slug".into(), slug_of(doc).map_or(Value::Null, Value::from));
        let categories: Vec<Value> = self
            .category_refs(doc)
            .into_iter()
            .map(|t| t.map_or(Value::Null, |title| json!({ "title": title })))
            .collect();
        out.insert("categories".into(), Value::Array(categories));
        let author = doc
            .get("author")
            .and_then(|a| a.get("_ref"))
            .and_then(Value::as_str)
            .and_then(|id| self.get(id))
            .map_or(Value::Null, |a| {
                json!({ "name": a.get("name").cloned().unwrap_or(Value::Null) })
            });
        out.insert("author".into(), author);
        Value::Object(out)
    }

    fn detail(&self, doc: &Value) -> Value {
        let mut out = match self.summary(doc) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        out.extend(pick(doc, DETAIL_FIELDS));
        Value::Object(out)
    }

    fn summaries<'a>(&self, docs: impl IntoIterator<Item = &'a Value>) -> Value {
        Value::Array(docs.into_iter().map(|d| self.summary(d)).collect())
    }

    fn author(&self) -> Value {
        let mut authors: Vec<&Value> = self.of_type("author").collect();
        authors.sort_by(|a, b| newest_first(b, a, "_createdAt"));
        authors
            .first()
            .map_or(Value::Null, |a| Value::Object(pick(a, AUTHOR_FIELDS)))
    }

    fn search(&self, term: &str, include_body: bool) -> Value {
        let needle = term.trim().to_lowercase();
        let mut hits: Vec<&Value> = self
            .recipes()
            .filter(|d| {
                contains(d, "title", &needle)
                    || contains(d, "excerpt", &needle)
                    || (include_body
                        && d.get("body").is_some_and(|body| {
                            portable_text::plain_text(body)
                                .to_lowercase()
                                .contains(&needle)
                        }))
            })
            .collect();
        hits.sort_by(|a, b| newest_first(a, b, "publishedAt"));

        Value::Array(
            hits.into_iter()
                .take(to_usize(SEARCH_LIMIT))
                .map(|d| {
                    let mut out = pick(d, &["_id", "_type", "title", "mainImage", "excerpt"]);
                    out.insert("slug".into(), slug_of(d).map_or(Value::Null, Value::from));
                    let titles: Vec<Value> = self
                        .category_refs(d)
                        .into_iter()
                        .map(|t| t.map_or(Value::Null, Value::from))
                        .collect();
                    out.insert("categories".into(), Value::Array(titles));
                    Value::Object(out)
                })
                .collect(),
        )
    }

    fn evaluate(&self, query: &ContentQuery) -> Value {
        match query {
            ContentQuery::RecipePage {
                filter,
                offset,
                limit,
            } => self.summaries(
                self.filtered(filter)
                    .into_iter()
                    .skip(to_usize(*offset))
                    .take(to_usize(*limit)),
            ),
            ContentQuery::RecipeCount { filter } => json!(self.filtered(filter).len()),
            ContentQuery::CategoryFacets => {
                let mut categories: Vec<(&str, &str)> = self
                    .of_type("category")
                    .filter_map(|c| {
                        Some((
                            c.get("_id").and_then(Value::as_str)?,
                            c.get("title").and_then(Value::as_str)?,
                        ))
                    })
                    .collect();
                categories.sort_by(|a, b| a.1.cmp(b.1));
                Value::Array(
                    categories
                        .into_iter()
                        .map(|(id, title)| {
                            let count = self.recipes().filter(|r| Self::references(r, id)).count();
                            json!({ "title": title, "count": count })
                        })
                        .collect(),
                )
            }
            ContentQuery::CategoryTitles => {
                let titles: BTreeSet<String> = self
                    .recipes()
                    .flat_map(|r| self.category_titles(r))
                    .collect();
                json!(titles)
            }
            ContentQuery::RecipeBySlug { slug } => self
                .recipes()
                .find(|d| slug_of(d) == Some(slug.as_str()))
                .map_or(Value::Null, |d| self.detail(d)),
            ContentQuery::OtherRecipes {
                exclude_slug,
                limit,
            } => self.summaries(
                self.filtered(&RecipeFilter::default())
                    .into_iter()
                    .filter(|d| slug_of(d) != Some(exclude_slug.as_str()))
                    .take(to_usize(*limit)),
            ),
            ContentQuery::RelatedRecipes {
                exclude_id,
                category,
                limit,
            } => self.summaries(
                self.in_category(category)
                    .into_iter()
                    .filter(|d| d.get("_id").and_then(Value::as_str) != Some(exclude_id.as_str()))
                    .take(to_usize(*limit)),
            ),
            ContentQuery::HomePage => {
                let mut recent: Vec<&Value> = self.recipes().collect();
                recent.sort_by(|a, b| newest_first(a, b, "_createdAt"));
                let posts = to_usize(HOME_RECENT_POSTS);
                json!({
                    "recentRecipes": self.summaries(recent.into_iter().take(to_usize(HOME_RECENT_RECIPES))),
                    "author": self.author(),
                    "recentDiary": self.summaries(
                        self.in_category(Section::Diario.category_title()).into_iter().take(posts)
                    ),
                    "recentTechniques": self.summaries(
                        self.in_category(Section::Tecniche.category_title()).into_iter().take(posts)
                    ),
                })
            }
            ContentQuery::Author => self.author(),
            ContentQuery::SectionPosts { category } => self.summaries(self.in_category(category)),
            ContentQuery::Search { term, include_body } => self.search(term, *include_body),
            ContentQuery::SitemapEntries => {
                let mut recipes: Vec<&Value> = self.recipes().collect();
                recipes.sort_by(|a, b| newest_first(a, b, "publishedAt"));
                Value::Array(
                    recipes
                        .into_iter()
                        .map(|d| {
                            json!({
                                "slug": slug_of(d),
                                "publishedAt": d.get("publishedAt").cloned().unwrap_or(Value::Null),
                                "_updatedAt": d.get("_updatedAt").cloned().unwrap_or(Value::Null),
                            })
                        })
                        .collect(),
                )
            }
            ContentQuery::TotalRecipes => json!(self.recipes().count()),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, query: &ContentQuery) -> Result<Value, CmsError> {
        Ok(self.evaluate(query))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Non-empty `slug.current` of a document.
fn slug_of(doc: &Value) -> Option<&str> {
    doc.get("slug")
        .and_then(|s| s.get("current"))
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn contains(doc: &Value, field: &str, needle: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|v| v.to_lowercase().contains(needle))
}

/// Descending order on an ISO timestamp field; documents without it sort last.
fn newest_first(a: &Value, b: &Value, field: &str) -> Ordering {
    let a = a.get(field).and_then(Value::as_str);
    let b = b.get(field).and_then(Value::as_str);
    b.cmp(&a)
}

fn pick(doc: &Value, fields: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| (f.to_string(), doc.get(*f).cloned().unwrap_or(Value::Null)))
        .collect()
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            json!({"_id": "cat-biscotti", "_type": "category", "title": "Biscotti"}),
            json!({"_id": "cat-tecniche", "_type": "category", "title": "Tecniche"}),
            json!({"_id": "author-1", "_type": "author", "name": "Cristian", "_createdAt": "2020-01-01T00:00:00Z"}),
            json!({
                "_id": "r1", "_type": "recipe", "title": "Cantucci",
                "slug": {"current": "cantucci"},
                "categories": [{"_ref": "cat-biscotti"}, {"_ref": "missing"}],
                "author": {"_ref": "author-1"},
                "difficulty": "facile",
                "publishedAt": "2024-02-01T00:00:00Z",
                "body": [{"_type": "block", "children": [{"_type": "span", "text": "Mandorle tostate"}]}]
            }),
            json!({
                "_id": "r2", "_type": "recipe", "title": "Pasta frolla",
                "slug": {"current": "pasta-frolla"},
                "excerpt": "La base di ogni crostata",
                "categories": [{"_ref": "cat-tecniche"}],
                "publishedAt": "2024-03-01T00:00:00Z"
            }),
            json!({"_id": "r3", "_type": "recipe", "title": "Senza slug"}),
            json!({"_id": "drafts.r1", "_type": "recipe", "title": "Bozza", "slug": {"current": "bozza"}}),
        ])
    }

    #[tokio::test]
    async fn drafts_and_slugless_recipes_are_hidden() {
        let store = store();
        let total = store.fetch(&ContentQuery::TotalRecipes).await.unwrap();
        assert_eq!(total, json!(2));
    }

    #[tokio::test]
    async fn page_is_sorted_and_projected() {
        let store = store();
        let page = store
            .fetch(&ContentQuery::RecipePage {
                filter: RecipeFilter::default(),
                offset: 0,
                limit: 10,
            })
            .await
            .unwrap();
        let page = page.as_array().unwrap();
        assert_eq!(page[0]["slug"], "pasta-frolla");
        assert_eq!(page[1]["categories"], json!([{"title": "Biscotti"}, null]));
        assert_eq!(page[1]["author"], json!({"name": "Cristian"}));
    }

    #[tokio::test]
    async fn category_filter_is_case_insensitive() {
        let store = store();
        let filter = RecipeFilter::new(Some("biscotti"), None, None);
        let count = store
            .fetch(&ContentQuery::RecipeCount { filter })
            .await
            .unwrap();
        assert_eq!(count, json!(1));
    }

    #[tokio::test]
    async fn facets_count_references() {
        let store = store();
        let facets = store.fetch(&ContentQuery::CategoryFacets).await.unwrap();
        assert_eq!(
            facets,
            json!([{"title": "Biscotti", "count": 1}, {"title": "Tecniche", "count": 1}])
        );
    }

    #[tokio::test]
    async fn search_can_include_body() {
        let store = store();
        let without = store
            .fetch(&ContentQuery::Search {
                term: "mandorle".into(),
                include_body: false,
            })
            .await
            .unwrap();
        assert_eq!(without, json!([]));

        let with = store
            .fetch(&ContentQuery::Search {
                term: "mandorle".into(),
                include_body: true,
            })
            .await
            .unwrap();
        assert_eq!(with[0]["categories"], json!(["Biscotti", null]));
    }

    #[test]
    fn ndjson_errors_name_the_line() {
        let err = MemoryStore::from_ndjson("{\"_id\": \"a\"}\n\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }
}
