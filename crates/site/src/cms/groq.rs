//! GROQ rendering of [`ContentQuery`] values.
//!
//! Projections live here so the HTTP store and its tests agree on the exact
//! shape of every result.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ContentQuery;
use super::filter::PUBLISHED_RECIPE;
use crate::classify::Section;

/// Card-level recipe projection.
const SUMMARY_PROJECTION: &str = r#"{
  _id,
  title,
  "slug": slug.current,
  mainImage,
  "categories": categories[]->{title},
  excerpt,
  "author": author->{name},
  publishedAt,
  difficulty,
  prepTime,
  cookTime,
  servings,
  rating
}"#;

/// Detail projection: the summary fields plus the full document body.
const DETAIL_PROJECTION: &str = r#"{
  _id,
  _updatedAt,
  title,
  "slug": slug.current,
  mainImage,
  "categories": categories[]->{title},
  excerpt,
  "author": author->{name},
  publishedAt,
  difficulty,
  prepTime,
  cookTime,
  servings,
  rating,
  reviews,
  cakePan,
  body,
  ingredients,
  instructions,
  tips,
  seo
}"#;

const AUTHOR_PROJECTION: &str = r#"{
  _id,
  name,
  image,
  bio,
  quote,
  experience,
  recipesCount,
  location,
  social,
  philosophy,
  story
}"#;

const SEARCH_PROJECTION: &str = r#"{
  _id,
  _type,
  title,
  "slug": slug.current,
  mainImage,
  excerpt,
  "categories": categories[]->title
}"#;

/// Upper bound on header search results.
pub const SEARCH_LIMIT: u64 = 50;

/// Recipes shown on the home page.
pub const HOME_RECENT_RECIPES: u64 = 4;

/// Diary and technique posts shown on the home page.
pub const HOME_RECENT_POSTS: u64 = 2;

/// A GROQ query with its bound parameters, serialized as the request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroqQuery {
    pub query: String,
    pub params: Map<String, Value>,
}

impl GroqQuery {
    fn new(query: String) -> Self {
        Self {
            query,
            params: Map::new(),
        }
    }

    fn param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Render a typed query as GROQ.
    pub fn build(query: &ContentQuery) -> Self {
        match query {
            ContentQuery::RecipePage {
                filter,
                offset,
                limit,
            } => {
                let predicate = filter.predicate();
                let end = offset.saturating_add(*limit);
                Self {
                    query: format!(
                        "*[{}] | order(publishedAt desc) [{offset}...{end}] {SUMMARY_PROJECTION}",
                        predicate.expression
                    ),
                    params: predicate.params,
                }
            }
            ContentQuery::RecipeCount { filter } => {
                let predicate = filter.predicate();
                Self {
                    query: format!("count(*[{}])", predicate.expression),
                    params: predicate.params,
                }
            }
            ContentQuery::CategoryFacets => Self::new(format!(
                r#"*[_type == "category" && defined(title)] | order(title asc) {{
  title,
  "count": count(*[{PUBLISHED_RECIPE} && references(^._id)])
}}"#
            )),
            ContentQuery::CategoryTitles => Self::new(format!(
                "array::unique(*[{PUBLISHED_RECIPE}].categories[]->title)"
            )),
            ContentQuery::RecipeBySlug { slug } => Self::new(format!(
                "*[{PUBLISHED_RECIPE} && slug.current == $slug][0] {DETAIL_PROJECTION}"
            ))
            .param("slug", slug.as_str()),
            ContentQuery::OtherRecipes {
                exclude_slug,
                limit,
            } => Self::new(format!(
                "*[{PUBLISHED_RECIPE} && slug.current != $slug] | order(publishedAt desc) [0...{limit}] {SUMMARY_PROJECTION}"
            ))
            .param("slug", exclude_slug.as_str()),
            ContentQuery::RelatedRecipes {
                exclude_id,
                category,
                limit,
            } => Self::new(format!(
                "*[{PUBLISHED_RECIPE} && _id != $excludeId && $category in categories[]->title] | order(publishedAt desc) [0...{limit}] {SUMMARY_PROJECTION}"
            ))
            .param("excludeId", exclude_id.as_str())
            .param("category", category.as_str()),
            ContentQuery::HomePage => Self::new(format!(
                r#"{{
  "recentRecipes": *[{PUBLISHED_RECIPE}] | order(_createdAt desc) [0...{HOME_RECENT_RECIPES}] {SUMMARY_PROJECTION},
  "author": *[_type == "author"] | order(_createdAt asc) [0] {AUTHOR_PROJECTION},
  "recentDiary": *[{PUBLISHED_RECIPE} && $diary in categories[]->title] | order(publishedAt desc) [0...{HOME_RECENT_POSTS}] {SUMMARY_PROJECTION},
  "recentTechniques": *[{PUBLISHED_RECIPE} && $techniques in categories[]->title] | order(publishedAt desc) [0...{HOME_RECENT_POSTS}] {SUMMARY_PROJECTION}
}}"#
            ))
            .param("diary", Section::Diario.category_title())
            .param("techniques", Section::Tecniche.category_title()),
            ContentQuery::Author => Self::new(format!(
                r#"*[_type == "author"] | order(_createdAt asc) [0] {AUTHOR_PROJECTION}"#
            )),
            ContentQuery::SectionPosts { category } => Self::new(format!(
                "*[{PUBLISHED_RECIPE} && $category in categories[]->title] | order(publishedAt desc) {SUMMARY_PROJECTION}"
            ))
            .param("category", category.as_str()),
            ContentQuery::Search { term, include_body } => {
                let body = if *include_body {
                    " || pt::text(body) match $q"
                } else {
                    ""
                };
                Self::new(format!(
                    "*[{PUBLISHED_RECIPE} && (title match $q || excerpt match $q{body})] | order(publishedAt desc) [0...{SEARCH_LIMIT}] {SEARCH_PROJECTION}"
                ))
                .param("q", format!("*{}*", term.trim()))
            }
            ContentQuery::SitemapEntries => Self::new(format!(
                r#"*[{PUBLISHED_RECIPE}] | order(publishedAt desc) {{ "slug": slug.current, publishedAt, _updatedAt }}"#
            )),
            ContentQuery::TotalRecipes => Self::new(format!("count(*[{PUBLISHED_RECIPE}])")),
        }
    }
}
