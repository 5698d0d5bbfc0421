//! SEO: page metadata, breadcrumbs and JSON-LD structured data.

pub mod breadcrumbs;
pub mod metadata;
pub mod structured_data;

pub use breadcrumbs::Breadcrumb;
pub use metadata::{OgImage, OpenGraph, PageMetadata, SeoBuilder, TwitterCard};
