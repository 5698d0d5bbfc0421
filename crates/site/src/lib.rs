//! Cristian's Pastry site.
//!
//! Server-rendered recipe, technique and diary pages sourced from a headless
//! CMS, with filtering, pagination, SEO metadata and a page render cache.
//! The `pastry` binary is the entry point for running the server.

pub mod cache;
pub mod classify;
pub mod cms;
pub mod config;
pub mod content;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seo;
pub mod site;
pub mod state;
pub mod theme;
