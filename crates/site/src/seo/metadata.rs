//! Page metadata: title, description, canonical URL, Open Graph and Twitter Card.
//!
//! Per-recipe values follow a fallback chain: the recipe's SEO override, then
//! the recipe's own title/excerpt/image, then the site defaults.

use serde::Serialize;

use crate::classify::Section;
use crate::cms::{ImageUrlBuilder, RecipeFilter};
use crate::listing::{listing_href, section_href};
use crate::models::{Author, ImageRef, Recipe, recipe_path};
use crate::site;

/// Social preview image size.
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Twitter descriptions longer than this are truncated.
const TWITTER_DESCRIPTION_MAX: usize = 150;
const TWITTER_DESCRIPTION_KEEP: usize = 147;

const NO_INDEX: &str = "noindex, nofollow";

/// Everything rendered into a page `<head>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical: String,
    pub keywords: Vec<String>,
    pub robots: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub site_name: &'static str,
    pub locale: &'static str,
    pub images: Vec<OgImage>,
    pub published_time: Option<String>,
    pub authors: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

impl PageMetadata {
    /// Keywords joined for the `keywords` meta tag.
    pub fn keywords_content(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Builds [`PageMetadata`] for each page type.
#[derive(Debug, Clone)]
pub struct SeoBuilder {
    site_url: String,
    images: ImageUrlBuilder,
}

impl SeoBuilder {
    pub fn new(site_url: &str, images: ImageUrlBuilder) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            images,
        }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    /// Absolute URL for a site path.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("https://") || path.starts_with("http://") {
            return path.to_string();
        }
        if path.is_empty() || path == "/" {
            return self.site_url.clone();
        }
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.site_url)
    }

    /// Social preview image for an image field.
    pub fn og_image(&self, image: &ImageRef, fallback_alt: &str) -> Option<OgImage> {
        let url = self
            .images
            .cropped(image, OG_IMAGE_WIDTH, OG_IMAGE_HEIGHT)?;
        Some(OgImage {
            url,
            width: OG_IMAGE_WIDTH,
            height: OG_IMAGE_HEIGHT,
            alt: image.alt_text().unwrap_or(fallback_alt).to_string(),
        })
    }

    /// Base metadata shared by every page type.
    fn page(
        &self,
        title: String,
        description: String,
        path: &str,
        kind: &'static str,
        image: Option<OgImage>,
    ) -> PageMetadata {
        let canonical = self.absolute(path);
        let images: Vec<OgImage> = image.into_iter().collect();
        let twitter = TwitterCard {
            card: if images.is_empty() {
                "summary"
            } else {
                "summary_large_image"
            },
            title: title.clone(),
            description: description.clone(),
            images: images.iter().map(|i| i.url.clone()).collect(),
        };
        PageMetadata {
            open_graph: OpenGraph {
                title: title.clone(),
                description: description.clone(),
                url: canonical.clone(),
                kind,
                site_name: site::SITE_NAME,
                locale: site::LOCALE,
                images,
                published_time: None,
                authors: Vec::new(),
                tags: Vec::new(),
            },
            twitter,
            title,
            description,
            canonical,
            keywords: site::DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            robots: None,
        }
    }

    pub fn home(&self) -> PageMetadata {
        self.page(
            format!("{} | Blog di pasticceria moderna", site::SITE_NAME),
            "Ricette, tecniche e storie di pasticceria italiana e internazionale. Scopri il blog di Cristian: dolci, basi, consigli e passione per la cucina.".to_string(),
            "/",
            "website",
            None,
        )
    }

    /// Recipe listing; title and description reflect the active filter.
    ///
    /// Category takes precedence over difficulty, difficulty over the query.
    pub fn listing(&self, filter: &RecipeFilter, page: u64, total_count: u64) -> PageMetadata {
        let mut title = format!("Ricette di Pasticceria | {}", site::SITE_NAME);
        let mut description = "Scopri le migliori ricette di pasticceria moderna italiana".to_string();
        let mut keywords = vec![
            "ricette pasticceria".to_string(),
            "dolci italiani".to_string(),
            "pasticceria moderna".to_string(),
            "tutorial dolci".to_string(),
        ];

        if let Some(category) = filter.category() {
            let name = capitalize(category);
            title = format!("{total_count} Ricette {name} | {}", site::SITE_NAME);
            description = format!(
                "{total_count} ricette di {} testate dal pasticcere.",
                name.to_lowercase()
            );
            keywords = vec![
                format!("ricette {}", name.to_lowercase()),
                format!("{name} pasticceria"),
            ];
        } else if let Some(difficulty) = filter.difficulty() {
            title = format!(
                "{total_count} Ricette {} | {}",
                difficulty.plural_label(),
                site::SITE_NAME
            );
            description = format!("{total_count} ricette di difficoltà {}", difficulty.as_str());
        } else if let Some(q) = filter.query() {
            title = format!("\"{q}\" - {total_count} Ricette | {}", site::SITE_NAME);
            description = format!("{total_count} ricette trovate per \"{q}\"");
        }

        let mut meta = self.page(
            title.clone(),
            description.clone(),
            &listing_href(filter, page),
            "website",
            None,
        );
        meta.keywords = keywords;
        meta.open_graph.title = format!("🍰 {title}");
        meta.open_graph.description = format!("{description} ⭐ Ricette testate con foto step-by-step");
        let short_title = title.split('|').next().unwrap_or(&title).trim();
        meta.twitter.title = format!("🍰 {short_title}");
        meta.twitter.description = truncate_description(&description);
        meta
    }

    /// Recipe detail page.
    pub fn recipe(&self, recipe: &Recipe) -> PageMetadata {
        let summary = &recipe.summary;
        let seo = recipe.seo.clone().unwrap_or_default();

        let title = recipe_title(recipe);
        let description = non_blank(seo.description.as_deref())
            .or_else(|| summary.excerpt_text())
            .unwrap_or(site::DEFAULT_DESCRIPTION)
            .to_string();
        let image = seo
            .image
            .as_ref()
            .and_then(|img| self.og_image(img, &title))
            .or_else(|| {
                summary
                    .main_image
                    .as_ref()
                    .and_then(|img| self.og_image(img, &title))
            });

        let canonical = non_blank(seo.canonical_url.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| recipe_path(&summary.slug));

        let mut meta = self.page(title, description, &canonical, "article", image);
        let tags = summary.category_titles();
        meta.keywords = if seo.keywords.is_empty() {
            tags.clone()
        } else {
            seo.keywords.clone()
        };
        if seo.no_index {
            meta.robots = Some(NO_INDEX.to_string());
        }
        meta.open_graph.published_time = summary.published_at.map(|d| d.to_rfc3339());
        meta.open_graph.authors = summary.author_name().map(str::to_string).into_iter().collect();
        meta.open_graph.tags = tags;
        meta
    }

    /// Technique or diary listing.
    pub fn section(&self, section: Section, page: u64) -> PageMetadata {
        let (title, description) = match section {
            Section::Tecniche => (
                "Tecniche di pasticceria",
                "Scopri tecniche, consigli e segreti di pasticceria moderna e tradizionale. Tutorial, step e trucchi per migliorare le tue abilità.",
            ),
            Section::Diario => (
                "Diario da commis",
                "Appunti, storie e riflessioni dal percorso di Cristian in pasticceria. Esperienze, emozioni e crescita professionale.",
            ),
            Section::Ricette => (
                "Ricette di Pasticceria",
                "Scopri le migliori ricette di pasticceria moderna italiana",
            ),
        };
        self.page(
            format!("{title} | {}", site::SITE_NAME),
            description.to_string(),
            &section_href(section.path(), page),
            "website",
            None,
        )
    }

    /// About page, using the author's portrait and first bio line when present.
    pub fn about(&self, author: Option<&Author>) -> PageMetadata {
        let bio_line = author
            .and_then(|a| a.bio.as_ref())
            .map(crate::content::portable_text::plain_text)
            .and_then(|text| text.lines().next().map(str::to_string))
            .filter(|line| !line.trim().is_empty());
        let description = bio_line.unwrap_or_else(|| {
            "Scopri chi è Cristian: storia, filosofia, esperienza e passione per la pasticceria. Bio, valori e percorso professionale.".to_string()
        });
        let image = author
            .and_then(|a| a.image.as_ref())
            .and_then(|img| self.og_image(img, site::OWNER_NAME));
        self.page(
            format!("Chi sono | {}", site::SITE_NAME),
            description,
            "/chi-sono",
            "profile",
            image,
        )
    }

    pub fn contact(&self) -> PageMetadata {
        self.page(
            format!("Contatti | {}", site::SITE_NAME),
            "Contatta Cristian per domande, collaborazioni, corsi e consulenze di pasticceria. Email, telefono, social e servizi disponibili.".to_string(),
            "/contatti",
            "website",
            None,
        )
    }

    /// Search results page. Never indexed.
    pub fn search(&self, term: Option<&str>, results: usize) -> PageMetadata {
        let (title, description, path) = match term {
            Some(q) => (
                format!("Cerca \"{q}\" | {}", site::SITE_NAME),
                format!("{results} risultati per \"{q}\""),
                format!("/search?q={}", urlencoding::encode(q)),
            ),
            None => (
                format!("Cerca | {}", site::SITE_NAME),
                "Cerca tra ricette, tecniche e diario".to_string(),
                "/search".to_string(),
            ),
        };
        let mut meta = self.page(title, description, &path, "website", None);
        meta.robots = Some(NO_INDEX.to_string());
        meta
    }

    pub fn not_found(&self) -> PageMetadata {
        let mut meta = self.page(
            format!("Pagina non trovata | {}", site::SITE_NAME),
            "La pagina che cerchi non esiste o è stata spostata.".to_string(),
            "/",
            "website",
            None,
        );
        meta.robots = Some(NO_INDEX.to_string());
        meta
    }
}

/// Display title of a recipe: SEO override, then title, then a generic label.
pub fn recipe_title(recipe: &Recipe) -> String {
    recipe
        .seo
        .as_ref()
        .and_then(|s| non_blank(s.title.as_deref()))
        .or_else(|| non_blank(Some(recipe.summary.title.as_str())))
        .unwrap_or("Ricetta")
        .to_string()
}

/// Upper-case the first character.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() > TWITTER_DESCRIPTION_MAX {
        let kept: String = text.chars().take(TWITTER_DESCRIPTION_KEEP).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
