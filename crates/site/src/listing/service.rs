//! Recipe query service.
//!
//! Translates page requests into [`ContentQuery`] reads, runs independent
//! reads concurrently, and decodes results at the boundary. Upstream failures
//! are logged and degraded to empty values so pages keep rendering; each
//! degraded read is noted so the page cache skips the render.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use super::degraded::note_degraded;
use super::pagination::{POSTS_PER_PAGE, Pagination, RECIPES_PER_PAGE, offset};
use crate::classify::{Section, classify};
use crate::cms::{
    CmsError, ContentQuery, ContentStore, RecipeFilter, decode_list, decode_optional, decode_rows,
};
use crate::models::{Author, CategoryFacet, Recipe, RecipeSummary, SitemapEntry};

/// One page of filtered recipes with facets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeListing {
    pub recipes: Vec<RecipeSummary>,
    pub total_count: u64,
    pub categories: Vec<CategoryFacet>,
    pub current_page: u64,
    pub total_pages: u64,
}

impl RecipeListing {
    /// The degraded result returned when any read fails.
    pub fn empty(page: u64) -> Self {
        Self {
            current_page: page.max(1),
            ..Self::default()
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.current_page, RECIPES_PER_PAGE, self.total_count)
    }
}

/// Content of the home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeContent {
    pub recent_recipes: Vec<RecipeSummary>,
    pub author: Option<Author>,
    pub recent_diary: Vec<RecipeSummary>,
    pub recent_techniques: Vec<RecipeSummary>,
}

/// One page of a technique or diary section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPage {
    pub section: Section,
    pub posts: Vec<RecipeSummary>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl SectionPage {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.current_page, POSTS_PER_PAGE, self.total_count)
    }
}

/// Header search results bucketed by section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    pub ricette: Vec<RecipeSummary>,
    pub tecniche: Vec<RecipeSummary>,
    pub diario: Vec<RecipeSummary>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.ricette.len() + self.tecniche.len() + self.diario.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    fn push(&mut self, hit: RecipeSummary) {
        let bucket = match classify(&hit.category_titles()) {
            Section::Ricette => &mut self.ricette,
            Section::Tecniche => &mut self.tecniche,
            Section::Diario => &mut self.diario,
        };
        bucket.push(hit);
    }
}

/// Read access to every piece of content the pages need.
#[derive(Clone)]
pub struct RecipeQueryService {
    store: Arc<dyn ContentStore>,
}

impl RecipeQueryService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Backend name of the underlying store.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// One listing page: items, total count and facets, read concurrently.
    ///
    /// Any failed read yields [`RecipeListing::empty`].
    pub async fn list_recipes(&self, filter: &RecipeFilter, page: u64) -> RecipeListing {
        let page = page.max(1);
        let page_query = ContentQuery::RecipePage {
            filter: filter.clone(),
            offset: offset(page, RECIPES_PER_PAGE),
            limit: RECIPES_PER_PAGE,
        };
        let count_query = ContentQuery::RecipeCount {
            filter: filter.clone(),
        };

        let result = tokio::try_join!(
            self.store.fetch(&page_query),
            self.store.fetch(&count_query),
            self.facets(),
        );

        let (items, count, categories) = match result {
            Ok(parts) => parts,
            Err(e) => {
                error!(error = %e, page, "recipe listing failed");
                note_degraded();
                return RecipeListing::empty(page);
            }
        };
        let total_count = match decode_count(&count) {
            Ok(total) => total,
            Err(e) => {
                error!(error = %e, page, "recipe count failed");
                note_degraded();
                return RecipeListing::empty(page);
            }
        };

        let pagination = Pagination::new(page, RECIPES_PER_PAGE, total_count);
        RecipeListing {
            recipes: decode_list(items, "recipes"),
            total_count,
            categories,
            current_page: page,
            total_pages: pagination.total_pages(),
        }
    }

    /// Facet counts, falling back to uncounted titles when counting fails.
    async fn facets(&self) -> Result<Vec<CategoryFacet>, CmsError> {
        match self.store.fetch(&ContentQuery::CategoryFacets).await {
            Ok(raw) => Ok(decode_rows(raw, "category_facets")),
            Err(e) => {
                warn!(error = %e, "facet counts failed, falling back to titles");
                note_degraded();
                let raw = self.store.fetch(&ContentQuery::CategoryTitles).await?;
                let mut titles: Vec<String> = raw
                    .as_array()
                    .map(|titles| {
                        titles
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                titles.sort();
                titles.dedup();
                Ok(titles.into_iter().map(CategoryFacet::uncounted).collect())
            }
        }
    }

    /// Home page bundle.
    pub async fn home(&self) -> HomeContent {
        let raw = match self.store.fetch(&ContentQuery::HomePage).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "home page content failed");
                note_degraded();
                return HomeContent::default();
            }
        };
        let mut raw = match raw {
            Value::Object(map) => map,
            _ => {
                note_degraded();
                return HomeContent::default();
            }
        };
        let mut take = |key: &str| raw.remove(key).unwrap_or(Value::Null);

        HomeContent {
            recent_recipes: decode_list(take("recentRecipes"), "recent_recipes"),
            author: decode_optional(take("author"), "author"),
            recent_diary: decode_list(take("recentDiary"), "recent_diary"),
            recent_techniques: decode_list(take("recentTechniques"), "recent_techniques"),
        }
    }

    /// Full recipe by slug; `None` when missing or unreadable.
    pub async fn recipe_by_slug(&self, slug: &str) -> Option<Recipe> {
        let query = ContentQuery::RecipeBySlug {
            slug: slug.to_string(),
        };
        match self.store.fetch(&query).await {
            Ok(raw) => decode_optional(raw, "recipe"),
            Err(e) => {
                error!(error = %e, slug, "recipe fetch failed");
                note_degraded();
                None
            }
        }
    }

    /// Latest recipes other than `exclude_slug`.
    pub async fn other_recipes(&self, exclude_slug: &str, limit: u64) -> Vec<RecipeSummary> {
        let query = ContentQuery::OtherRecipes {
            exclude_slug: exclude_slug.to_string(),
            limit,
        };
        self.fetch_list(&query, "other_recipes").await
    }

    /// Latest recipes sharing the first category of `recipe`.
    ///
    /// Falls back to the latest other recipes when the recipe has no category
    /// or nothing else shares it.
    pub async fn related_recipes(&self, recipe: &RecipeSummary, limit: u64) -> Vec<RecipeSummary> {
        if let Some(category) = recipe.categories.first() {
            let query = ContentQuery::RelatedRecipes {
                exclude_id: recipe.id.clone(),
                category: category.title.clone(),
                limit,
            };
            let related = self.fetch_list(&query, "related_recipes").await;
            if !related.is_empty() {
                return related;
            }
        }
        self.other_recipes(&recipe.slug, limit).await
    }

    /// The site author.
    pub async fn author(&self) -> Option<Author> {
        match self.store.fetch(&ContentQuery::Author).await {
            Ok(raw) => decode_optional(raw, "author"),
            Err(e) => {
                error!(error = %e, "author fetch failed");
                note_degraded();
                None
            }
        }
    }

    /// One page of a technique or diary section, paginated after decoding.
    pub async fn section_posts(&self, section: Section, page: u64) -> SectionPage {
        let page = page.max(1);
        let query = ContentQuery::SectionPosts {
            category: section.category_title().to_string(),
        };
        let posts = self.fetch_list(&query, "section_posts").await;

        let pagination = Pagination::new(page, POSTS_PER_PAGE, posts.len() as u64);
        let start = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);

        SectionPage {
            section,
            total_count: pagination.total_count(),
            total_pages: pagination.total_pages(),
            current_page: page,
            posts: posts.into_iter().skip(start).take(limit).collect(),
        }
    }

    /// Header search, bucketed by section.
    ///
    /// Searches the rich-text body first and retries on title and excerpt
    /// alone when the body query is rejected.
    pub async fn search(&self, term: &str) -> SearchResults {
        let term = term.trim();
        if term.is_empty() {
            return SearchResults::default();
        }

        let with_body = ContentQuery::Search {
            term: term.to_string(),
            include_body: true,
        };
        let raw = match self.store.fetch(&with_body).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "body search failed, retrying without body");
                note_degraded();
                let without_body = ContentQuery::Search {
                    term: term.to_string(),
                    include_body: false,
                };
                match self.store.fetch(&without_body).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        error!(error = %e, "search failed");
                        note_degraded();
                        return SearchResults::default();
                    }
                }
            }
        };

        let mut results = SearchResults::default();
        for hit in decode_list::<RecipeSummary>(raw, "search") {
            results.push(hit);
        }
        results
    }

    /// Every published recipe slug for the sitemap.
    pub async fn sitemap_entries(&self) -> Vec<SitemapEntry> {
        match self.store.fetch(&ContentQuery::SitemapEntries).await {
            Ok(raw) => decode_rows(raw, "sitemap_entries"),
            Err(e) => {
                error!(error = %e, "sitemap entries failed");
                note_degraded();
                Vec::new()
            }
        }
    }

    /// Count of published recipes. Errors are returned, not degraded.
    pub async fn total_recipes(&self) -> Result<u64, CmsError> {
        let raw = self.store.fetch(&ContentQuery::TotalRecipes).await?;
        decode_count(&raw)
    }

    async fn fetch_list(&self, query: &ContentQuery, what: &'static str) -> Vec<RecipeSummary> {
        match self.store.fetch(query).await {
            Ok(raw) => decode_list(raw, what),
            Err(e) => {
                error!(error = %e, kind = query.kind(), "content fetch failed");
                note_degraded();
                Vec::new()
            }
        }
    }
}

fn decode_count(value: &Value) -> Result<u64, CmsError> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64))
        .ok_or_else(|| CmsError::Decode(format!("expected a count, got {value}")))
}
