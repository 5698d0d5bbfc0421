//! Recipe filter predicates.
//!
//! A [`RecipeFilter`] holds normalized listing inputs. [`RecipeFilter::predicate`]
//! renders it as a GROQ filter expression whose user-supplied values are bound
//! parameters, so the expression text depends only on which filters are set.

use serde_json::{Map, Value};

use crate::models::Difficulty;

/// Base condition for every listed recipe: published, with a slug.
pub const PUBLISHED_RECIPE: &str =
    r#"_type == "recipe" && defined(slug.current) && !(_id in path("drafts.**"))"#;

/// Category value meaning "no category filter".
const ALL_CATEGORIES: &str = "tutte";

/// Normalized recipe listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    category: Option<String>,
    difficulty: Option<Difficulty>,
    query: Option<String>,
}

/// A filter expression with its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub expression: String,
    pub params: Map<String, Value>,
}

/// Case folding used for every category title comparison.
///
/// Unicode lowercase, matching GROQ `lower()`.
pub fn fold_title(title: &str) -> String {
    title.to_lowercase()
}

/// Category titles equal ignoring case.
pub fn titles_match(a: &str, b: &str) -> bool {
    a == b || fold_title(a) == fold_title(b)
}

impl RecipeFilter {
    /// Build a filter from raw request values.
    ///
    /// Blank values are absent, `tutte` (any case) clears the category and
    /// unknown difficulty values are ignored.
    pub fn new(category: Option<&str>, difficulty: Option<&str>, query: Option<&str>) -> Self {
        let category = non_blank(category).filter(|c| !titles_match(c, ALL_CATEGORIES));
        let difficulty = non_blank(difficulty).and_then(|d| Difficulty::parse(&d));
        let query = non_blank(query);
        Self {
            category,
            difficulty,
            query,
        }
    }

    /// Filter on one category title.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = non_blank(Some(category))
            .filter(|c| !titles_match(c, ALL_CATEGORIES));
        self
    }

    /// Filter on difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Filter on free text.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = non_blank(Some(query));
        self
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// True when no filter is active.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.difficulty.is_none() && self.query.is_none()
    }

    /// Wildcard pattern for the free-text match (`*term*`).
    pub fn search_pattern(&self) -> Option<String> {
        self.query.as_deref().map(|q| format!("*{q}*"))
    }

    /// Render the filter as a GROQ expression plus bound parameters.
    pub fn predicate(&self) -> Predicate {
        let mut clauses = vec![PUBLISHED_RECIPE.to_string()];
        let mut params = Map::new();

        if let Some(category) = &self.category {
            clauses.push("count((categories[]->title)[lower(@) == $category]) > 0".to_string());
            params.insert("category".into(), Value::String(fold_title(category)));
        }
        if let Some(difficulty) = self.difficulty {
            clauses.push("difficulty == $difficulty".to_string());
            params.insert(
                "difficulty".into(),
                Value::String(difficulty.as_str().to_string()),
            );
        }
        if let Some(pattern) = self.search_pattern() {
            clauses.push("(title match $searchTerm || excerpt match $searchTerm)".to_string());
            params.insert("searchTerm".into(), Value::String(pattern));
        }

        Predicate {
            expression: clauses.join(" && "),
            params,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_base_predicate() {
        let filter = RecipeFilter::new(None, None, None);
        assert!(filter.is_empty());
        let predicate = filter.predicate();
        assert_eq!(predicate.expression, PUBLISHED_RECIPE);
        assert!(predicate.params.is_empty());
    }

    #[test]
    fn blank_and_all_values_are_absent() {
        let filter = RecipeFilter::new(Some("  "), Some(""), Some(" \t "));
        assert!(filter.is_empty());
        assert!(RecipeFilter::new(Some("Tutte"), None, None).is_empty());
        assert!(RecipeFilter::new(Some("TUTTE"), None, None).is_empty());
        assert!(RecipeFilter::new(None, Some("impossibile"), None).is_empty());
    }

    #[test]
    fn values_are_bound_not_spliced() {
        let filter = RecipeFilter::new(
            Some("Biscotti\" || true || \""),
            Some("easy"),
            Some("  frolla \"x\" "),
        );
        let predicate = filter.predicate();

        assert!(!predicate.expression.contains("Biscotti"));
        assert!(!predicate.expression.contains("frolla"));
        assert_eq!(
            predicate.params["category"],
            Value::String("biscotti\" || true || \"".into())
        );
        assert_eq!(predicate.params["difficulty"], Value::String("facile".into()));
        assert_eq!(
            predicate.params["searchTerm"],
            Value::String("*frolla \"x\"*".into())
        );
    }

    #[test]
    fn category_param_folds_unicode() {
        let predicate = RecipeFilter::new(Some("CRÈME & MOUSSE"), None, None).predicate();
        assert_eq!(
            predicate.params["category"],
            Value::String("crème & mousse".into())
        );
        assert_eq!(RecipeFilter::new(Some("TUTTE"), None, None).category(), None);
    }

    #[test]
    fn expression_depends_only_on_active_filters() {
        let a = RecipeFilter::new(Some("Biscotti"), None, Some("burro")).predicate();
        let b = RecipeFilter::new(Some("Cioccolato"), None, Some("panna")).predicate();
        assert_eq!(a.expression, b.expression);
        assert_ne!(a.params, b.params);
    }

    #[test]
    fn builders_normalize_like_new() {
        let filter = RecipeFilter::default()
            .with_category(" Biscotti ")
            .with_difficulty(Difficulty::Hard)
            .with_query("   ");
        assert_eq!(filter.category(), Some("Biscotti"));
        assert_eq!(filter.difficulty(), Some(Difficulty::Hard));
        assert_eq!(filter.query(), None);
    }
}
