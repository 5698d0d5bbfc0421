//! Tera theme engine.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike};
use tera::Tera;
use tracing::debug;

use crate::routes::helpers::html_escape;

const MONTHS: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

/// Theme engine for rendering templates.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Create a new theme engine loading templates from the given directory.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self { tera })
    }

    /// Create a theme engine with no templates (for testing).
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        Self::register_filters(&mut tera);
        Self { tera }
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // Same escaping as hand-built HTML; `/` stays literal in URLs
        tera.set_escape_fn(html_escape);

        // RFC 3339 timestamp as an Italian long date ("1 marzo 2024")
        tera.register_filter(
            "format_date",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let formatted = value
                    .as_str()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| {
                        let month = MONTHS
                            .get(dt.month0() as usize)
                            .copied()
                            .unwrap_or_default();
                        format!("{} {month} {}", dt.day(), dt.year())
                    })
                    .unwrap_or_default();
                Ok(tera::Value::String(formatted))
            },
        );

        // Minutes as "45 min" or "1 h 15 min"
        tera.register_filter(
            "minutes",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let Some(total) = value.as_u64() else {
                    return Ok(tera::Value::String(String::new()));
                };
                let formatted = match (total / 60, total % 60) {
                    (0, m) => format!("{m} min"),
                    (h, 0) => format!("{h} h"),
                    (h, m) => format!("{h} h {m} min"),
                };
                Ok(tera::Value::String(formatted))
            },
        );
    }

    /// Get the underlying Tera instance.
    pub fn tera(&self) -> &Tera {
        &self.tera
    }

    /// Get a mutable reference to Tera (for adding templates at runtime).
    pub fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }

    /// Render a named template.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render template {template}"))
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn render(template: &str, key: &str, value: tera::Value) -> String {
        let mut engine = ThemeEngine::empty();
        engine.tera_mut().add_raw_template("t", template).unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert(key, &value);
        engine.render("t", &ctx).unwrap()
    }

    #[test]
    fn format_date_in_italian() {
        let out = render(
            "{{ d | format_date }}",
            "d",
            tera::Value::String("2024-03-01T10:00:00Z".into()),
        );
        assert_eq!(out, "1 marzo 2024");
    }

    #[test]
    fn format_date_ignores_garbage() {
        let out = render("{{ d | format_date }}", "d", tera::Value::String("ieri".into()));
        assert_eq!(out, "");
    }

    #[test]
    fn minutes_filter() {
        assert_eq!(render("{{ m | minutes }}", "m", 45.into()), "45 min");
        assert_eq!(render("{{ m | minutes }}", "m", 60.into()), "1 h");
        assert_eq!(render("{{ m | minutes }}", "m", 95.into()), "1 h 35 min");
    }

    #[test]
    fn autoescape_keeps_urls_readable() {
        let mut engine = ThemeEngine::empty();
        engine
            .tera_mut()
            .add_raw_template("link.html", "<a href=\"{{ href }}\">{{ label }}</a>")
            .unwrap();
        let mut ctx = tera::Context::new();
        ctx.insert("href", "/ricette?categoria=torte&page=2");
        ctx.insert("label", "<Torte>");
        assert_eq!(
            engine.render("link.html", &ctx).unwrap(),
            "<a href=\"/ricette?categoria=torte&amp;page=2\">&lt;Torte&gt;</a>"
        );
    }

    #[test]
    fn missing_template_is_an_error() {
        let engine = ThemeEngine::empty();
        assert!(engine.render("nope.html", &tera::Context::new()).is_err());
    }

    #[test]
    fn loads_site_templates() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        let engine = ThemeEngine::new(&dir).unwrap();
        let names: Vec<_> = engine.tera().get_template_names().collect();
        assert!(names.contains(&"base.html"));
        assert!(names.contains(&"recipes.html"));
    }
}
