//! `sitemap.xml` and `robots.txt`.

use std::fmt::Write;

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::models::{SitemapEntry, recipe_path};
use crate::seo::SeoBuilder;
use crate::site;
use crate::state::AppState;

use super::helpers::html_escape;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
}

async fn sitemap(State(state): State<AppState>) -> Response {
    let entries = state.recipes().sitemap_entries().await;
    (
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        sitemap_xml(state.seo(), &entries),
    )
        .into_response()
}

async fn robots(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(state.seo().site_url()),
    )
        .into_response()
}

/// Static pages followed by every published recipe.
pub fn sitemap_xml(seo: &SeoBuilder, entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for path in site::STATIC_PATHS {
        let priority = if path.is_empty() { "1.0" } else { "0.8" };
        push_url(&mut xml, &seo.absolute(path), None, "weekly", priority);
    }
    for entry in entries {
        let lastmod = entry.last_modified().map(|d| d.to_rfc3339());
        push_url(
            &mut xml,
            &seo.absolute(&recipe_path(&entry.slug)),
            lastmod.as_deref(),
            "monthly",
            "0.7",
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>, changefreq: &str, priority: &str) {
    let _ = write!(xml, "  <url>\n    <loc>{}</loc>\n", html_escape(loc));
    if let Some(lastmod) = lastmod {
        let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
    }
    let _ = write!(
        xml,
        "    <changefreq>{changefreq}</changefreq>\n    <priority>{priority}</priority>\n  </url>\n"
    );
}

/// Allow everything and point at the sitemap.
pub fn robots_txt(site_url: &str) -> String {
    format!("User-agent: *\nAllow: /\nSitemap: {site_url}/sitemap.xml\n")
}
