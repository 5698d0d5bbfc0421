//! Application state shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::cache::PageCache;
use crate::cms::{ContentStore, ImageUrlBuilder, MemoryStore, SanityConfig, SanityStore};
use crate::config::Config;
use crate::listing::RecipeQueryService;
use crate::seo::SeoBuilder;
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Read access to CMS content.
    recipes: RecipeQueryService,

    /// Tera templates.
    theme: Arc<ThemeEngine>,

    /// Rendered page cache, cleared by the revalidation webhook.
    cache: PageCache,

    /// Page metadata builder.
    seo: SeoBuilder,
}

impl AppState {
    /// Create application state, selecting the content store from config.
    pub async fn new(config: &Config) -> Result<Self> {
        let store = build_store(config).await?;
        let theme = ThemeEngine::new(&config.templates_dir)
            .with_context(|| format!("failed to load templates from {}", config.templates_dir.display()))?;
        Ok(Self::with_store(config.clone(), store, theme))
    }

    /// Create application state around an existing store and theme.
    pub fn with_store(config: Config, store: Arc<dyn ContentStore>, theme: ThemeEngine) -> Self {
        let images = ImageUrlBuilder::new(config.image_project_id(), config.sanity_dataset.clone());
        let seo = SeoBuilder::new(&config.site_url, images);
        let cache = PageCache::new(Duration::from_secs(config.revalidate_ttl_secs));

        info!(backend = store.backend(), "content store ready");

        Self {
            inner: Arc::new(AppStateInner {
                recipes: RecipeQueryService::new(store),
                theme: Arc::new(theme),
                cache,
                seo,
                config,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn recipes(&self) -> &RecipeQueryService {
        &self.inner.recipes
    }

    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    pub fn cache(&self) -> &PageCache {
        &self.inner.cache
    }

    pub fn seo(&self) -> &SeoBuilder {
        &self.inner.seo
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        self.inner.seo.images()
    }
}

/// The fixture store when `CMS_FIXTURE_PATH` is set, Sanity otherwise.
async fn build_store(config: &Config) -> Result<Arc<dyn ContentStore>> {
    if let Some(path) = &config.fixture_path {
        let store = MemoryStore::load(path)
            .await
            .context("failed to load content fixture")?;
        return Ok(Arc::new(store));
    }

    let sanity = SanityConfig::from_config(config).context("SANITY_PROJECT_ID is not set")?;
    info!(endpoint = %sanity.endpoint(), "using Sanity content API");
    Ok(Arc::new(SanityStore::new(sanity)))
}
