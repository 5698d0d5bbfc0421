//! Request query parameters.
//!
//! Every field is taken as a raw string so malformed values degrade to
//! defaults instead of rejecting the request.

use serde::Deserialize;

use crate::cms::RecipeFilter;

/// `/ricette` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    pub categoria: Option<String>,
    pub difficolta: Option<String>,
    pub q: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Normalized recipe filter.
    pub fn filter(&self) -> RecipeFilter {
        RecipeFilter::new(
            self.categoria.as_deref(),
            self.difficolta.as_deref(),
            self.q.as_deref(),
        )
    }

    /// Requested page, at least 1.
    pub fn page(&self) -> u64 {
        parse_page(self.page.as_deref())
    }
}

/// `?page=` on section listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        parse_page(self.page.as_deref())
    }
}

/// `?q=` on search endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    /// Trimmed search term, if any.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// `?secret=` on the revalidation webhook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevalidateQuery {
    pub secret: Option<String>,
}

/// Parse a page number; missing, malformed and zero values mean page 1.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|p| p.trim().parse::<u64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}
