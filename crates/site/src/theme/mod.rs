//! Theme engine and view models.
//!
//! Templates receive view models computed here rather than raw CMS documents,
//! so every URL, label and escaped fragment is decided in Rust.

mod engine;
pub mod view;

pub use engine::ThemeEngine;
