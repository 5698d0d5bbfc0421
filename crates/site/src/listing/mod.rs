//! Recipe listings: pagination and the query service behind every page.

pub mod degraded;
pub mod pagination;
pub mod service;

pub use degraded::{note_degraded, track_degraded};
pub use pagination::{
    POSTS_PER_PAGE, PageLink, PageNavigation, Pagination, RECIPES_PER_PAGE, listing_href,
    section_href,
};
pub use service::{HomeContent, RecipeListing, RecipeQueryService, SearchResults, SectionPage};
