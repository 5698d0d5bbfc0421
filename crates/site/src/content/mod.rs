//! Rich-text content rendering.

pub mod portable_text;
