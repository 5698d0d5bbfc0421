//! Headless CMS access.
//!
//! This module provides:
//! - ContentStore: the read-only seam every page goes through
//! - ContentQuery: typed description of each read the site performs
//! - RecipeFilter: filter predicate builder with bound parameters
//! - SanityStore: HTTP client for the Sanity query API
//! - MemoryStore: evaluates the same queries over an NDJSON dataset export
//! - ImageUrlBuilder: CDN URLs for image asset references

mod decode;
mod filter;
mod groq;
mod image;
mod memory;
mod sanity;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use decode::{decode_list, decode_optional, decode_rows};
pub use filter::{PUBLISHED_RECIPE, Predicate, RecipeFilter, fold_title, titles_match};
pub use groq::GroqQuery;
pub use image::{AssetId, ImageUrlBuilder};
pub use memory::MemoryStore;
pub use sanity::{SanityConfig, SanityStore};

/// Errors raised while reading from the content store.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("fixture error: {0}")]
    Fixture(String),
}

/// Every read the site issues against the CMS.
///
/// Variants carry already-normalized inputs; stores must bind user values as
/// parameters, never splice them into query text.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentQuery {
    /// One page of recipe summaries matching a filter, newest first.
    RecipePage {
        filter: RecipeFilter,
        offset: u64,
        limit: u64,
    },
    /// Number of recipes matching a filter.
    RecipeCount { filter: RecipeFilter },
    /// Category titles with the number of slugged recipes referencing each.
    CategoryFacets,
    /// Plain category title list (facet fallback).
    CategoryTitles,
    /// Full recipe document for a detail page.
    RecipeBySlug { slug: String },
    /// Latest recipes excluding the one being viewed.
    OtherRecipes { exclude_slug: String, limit: u64 },
    /// Latest recipes sharing a category, excluding one recipe.
    RelatedRecipes {
        exclude_id: String,
        category: String,
        limit: u64,
    },
    /// Bundle for the home page: recent recipes, author, diary, techniques.
    HomePage,
    /// The site author (first created author record).
    Author,
    /// Every recipe tagged with a section category, newest first.
    SectionPosts { category: String },
    /// Header search over title and excerpt, optionally rich-text body.
    Search { term: String, include_body: bool },
    /// Slugs and timestamps for the sitemap.
    SitemapEntries,
    /// Count of every published recipe (health probe).
    TotalRecipes,
}

impl ContentQuery {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentQuery::RecipePage { .. } => "recipe_page",
            ContentQuery::RecipeCount { .. } => "recipe_count",
            ContentQuery::CategoryFacets => "category_facets",
            ContentQuery::CategoryTitles => "category_titles",
            ContentQuery::RecipeBySlug { .. } => "recipe_by_slug",
            ContentQuery::OtherRecipes { .. } => "other_recipes",
            ContentQuery::RelatedRecipes { .. } => "related_recipes",
            ContentQuery::HomePage => "home_page",
            ContentQuery::Author => "author",
            ContentQuery::SectionPosts { .. } => "section_posts",
            ContentQuery::Search { .. } => "search",
            ContentQuery::SitemapEntries => "sitemap_entries",
            ContentQuery::TotalRecipes => "total_recipes",
        }
    }
}

/// Read-only access to CMS content.
///
/// Implementations return the raw JSON result of a query; decoding into
/// typed entities happens in the query service.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Execute a query and return its JSON result.
    async fn fetch(&self, query: &ContentQuery) -> Result<Value, CmsError>;

    /// Backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}
