//! Shared route helpers for page rendering.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{Datelike, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::listing::note_degraded;
use crate::seo::structured_data::{breadcrumb_list, to_script_json};
use crate::seo::{Breadcrumb, PageMetadata};
use crate::site;
use crate::state::AppState;

/// Navigation entry with its active state.
#[derive(Debug, Serialize)]
struct NavItem {
    label: &'static str,
    href: &'static str,
    active: bool,
}

fn nav_items(path: &str) -> Vec<NavItem> {
    site::NAV_LINKS
        .iter()
        .map(|link| NavItem {
            label: link.label,
            href: link.href,
            active: link.href == path || (link.href != "/" && path.starts_with(link.href)),
        })
        .collect()
}

/// Inject site-wide context variables into a Tera context.
///
/// Adds: `site_name`, `tagline`, `nav_links`, `current_path`, `social_profiles`,
/// `contact_email`, `contact_phone`, `language`, `site_url`, `year`
pub fn inject_site_context(state: &AppState, context: &mut tera::Context, path: &str) {
    context.insert("site_name", site::SITE_NAME);
    context.insert("tagline", site::TAGLINE);
    context.insert("nav_links", &nav_items(path));
    context.insert("current_path", path);
    context.insert("social_profiles", site::SOCIAL_PROFILES);
    context.insert("contact_email", site::CONTACT_EMAIL);
    context.insert("contact_phone", site::CONTACT_PHONE);
    context.insert("language", site::LANGUAGE);
    context.insert("site_url", state.seo().site_url());
    context.insert("year", &Utc::now().year());
}

/// Insert `meta` plus the JSON-LD scripts for a page.
///
/// A non-empty breadcrumb trail also yields a `BreadcrumbList` script.
pub fn inject_head(
    state: &AppState,
    context: &mut tera::Context,
    meta: &PageMetadata,
    breadcrumbs: &[Breadcrumb],
    mut json_ld: Vec<Value>,
) {
    if !breadcrumbs.is_empty() {
        json_ld.push(breadcrumb_list(state.seo(), breadcrumbs));
    }
    let scripts: Vec<String> = json_ld.iter().map(to_script_json).collect();
    context.insert("meta", meta);
    context.insert("keywords", &meta.keywords_content());
    context.insert("breadcrumbs", breadcrumbs);
    context.insert("json_ld", &scripts);
}

/// Render a page template, falling back to a minimal page on template errors.
pub fn render_page(
    state: &AppState,
    template: &str,
    context: &tera::Context,
    status: StatusCode,
) -> Response {
    match state.theme().render(template, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, template = %template, "failed to render template");
            note_degraded();
            let title = context
                .get("meta")
                .and_then(|m| m.get("title"))
                .and_then(Value::as_str)
                .unwrap_or(site::DEFAULT_TITLE);
            (status, Html(fallback_html(title))).into_response()
        }
    }
}

/// The 404 page.
pub fn not_found_page(state: &AppState, path: &str) -> Response {
    let mut context = tera::Context::new();
    inject_site_context(state, &mut context, path);
    inject_head(state, &mut context, &state.seo().not_found(), &[], Vec::new());
    render_page(state, "not_found.html", &context, StatusCode::NOT_FOUND)
}

fn fallback_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="it"><head><meta charset="utf-8"><title>{}</title></head>
<body><h1>{}</h1><p>La pagina non è al momento disponibile. <a href="/">Torna alla home</a></p></body></html>"#,
        html_escape(title),
        html_escape(site::SITE_NAME)
    )
}

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
