//! Pagination arithmetic and page-link navigation.

use serde::Serialize;
use url::form_urlencoded;

use crate::cms::RecipeFilter;

/// Recipes per listing page.
pub const RECIPES_PER_PAGE: u64 = 12;

/// Posts per technique/diary page.
pub const POSTS_PER_PAGE: u64 = 9;

/// Pages shown on each side of the current page.
const WINDOW_RADIUS: u64 = 2;

/// A page request over a result set of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
    total_count: u64,
}

impl Pagination {
    /// Page numbers below 1 mean page 1; limits below 1 mean 1.
    pub fn new(page: u64, limit: u64, total_count: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            total_count,
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> u64 {
        offset(self.page, self.limit)
    }

    /// `ceil(total_count / limit)`; zero when there are no items.
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(self.limit)
    }

    /// Build the navigation for this page, or `None` when everything fits on one page.
    pub fn navigation(&self, href: impl Fn(u64) -> String) -> Option<PageNavigation> {
        let total = self.total_pages();
        if total <= 1 {
            return None;
        }

        let anchor = self.page.min(total);
        let start = anchor.saturating_sub(WINDOW_RADIUS).max(1);
        let end = (anchor + WINDOW_RADIUS).min(total);

        let mut links = Vec::new();
        if start > 1 {
            links.push(PageLink::page(1, self.page, &href));
            if start > 2 {
                links.push(PageLink::ellipsis());
            }
        }
        for number in start..=end {
            links.push(PageLink::page(number, self.page, &href));
        }
        if end < total {
            if end + 1 < total {
                links.push(PageLink::ellipsis());
            }
            links.push(PageLink::page(total, self.page, &href));
        }

        Some(PageNavigation {
            previous: (self.page > 1).then(|| href(self.page - 1)),
            next: (self.page < total).then(|| href(self.page + 1)),
            links,
            current: self.page,
            total_pages: total,
        })
    }
}

/// Offset of the first item of `page`, treating page 0 as page 1.
pub fn offset(page: u64, limit: u64) -> u64 {
    page.max(1).saturating_sub(1).saturating_mul(limit.max(1))
}

/// Rendered pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageNavigation {
    pub previous: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
    pub current: u64,
    pub total_pages: u64,
}

/// A numbered page link or an ellipsis marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: Option<u64>,
    pub href: Option<String>,
    pub current: bool,
}

impl PageLink {
    fn page(number: u64, current: u64, href: &impl Fn(u64) -> String) -> Self {
        Self {
            number: Some(number),
            href: Some(href(number)),
            current: number == current,
        }
    }

    fn ellipsis() -> Self {
        Self {
            number: None,
            href: None,
            current: false,
        }
    }
}

/// Recipe listing URL keeping the active filters; `page` only when above 1.
pub fn listing_href(filter: &RecipeFilter, page: u64) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(category) = filter.category() {
        query.append_pair("categoria", category);
    }
    if let Some(difficulty) = filter.difficulty() {
        query.append_pair("difficolta", difficulty.as_str());
    }
    if let Some(q) = filter.query() {
        query.append_pair("q", q);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    with_query("/ricette", query.finish())
}

/// Generic section URL: `base?page=n` for pages above 1.
pub fn section_href(base: &str, page: u64) -> String {
    if page > 1 {
        format!("{base}?page={page}")
    } else {
        base.to_string()
    }
}

fn with_query(path: &str, query: String) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
