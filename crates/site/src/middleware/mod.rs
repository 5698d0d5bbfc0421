//! HTTP middleware components.
//!
//! Provides the page render cache and the studio basic-auth gate.

pub mod page_cache;
pub mod studio_auth;

pub use page_cache::cache_pages;
pub use studio_auth::require_studio_auth;
