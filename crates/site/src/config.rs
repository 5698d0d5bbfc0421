//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Public site URL used for canonical links, sitemap and robots.txt.
    pub site_url: String,

    /// Sanity project ID. Required unless `fixture_path` is set.
    pub sanity_project_id: Option<String>,

    /// Sanity dataset (default: production).
    pub sanity_dataset: String,

    /// Sanity API version date (default: 2024-01-01).
    pub sanity_api_version: String,

    /// Query the CDN-backed API host (default: true).
    pub sanity_use_cdn: bool,

    /// Optional read token for private datasets.
    pub sanity_api_token: Option<String>,

    /// Upstream request timeout in seconds (default: 10).
    pub sanity_timeout_secs: u64,

    /// NDJSON dataset export served from memory instead of the Sanity API.
    pub fixture_path: Option<PathBuf>,

    /// Shared secret for the revalidation webhook. When None, every call is rejected.
    pub revalidate_secret: Option<String>,

    /// Lifetime of a cached page render in seconds (default: 3600).
    pub revalidate_ttl_secs: u64,

    /// Basic-auth username for the studio route.
    pub studio_username: Option<String>,

    /// Basic-auth password for the studio route.
    pub studio_password: Option<String>,

    /// Hosted studio URL that authenticated `/studio` requests redirect to.
    pub studio_url: Option<String>,

    /// Path to the Tera templates directory (default: ./templates).
    pub templates_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let site_url = env::var("SITE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let sanity_project_id = non_empty_var("SANITY_PROJECT_ID");

        let sanity_dataset =
            env::var("SANITY_DATASET").unwrap_or_else(|_| "production".to_string());

        let sanity_api_version =
            env::var("SANITY_API_VERSION").unwrap_or_else(|_| "2024-01-01".to_string());

        let sanity_use_cdn = env::var("SANITY_USE_CDN")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        let sanity_api_token = non_empty_var("SANITY_API_TOKEN");

        let sanity_timeout_secs = env::var("SANITY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("SANITY_TIMEOUT_SECS must be a valid u64")?;

        let fixture_path = non_empty_var("CMS_FIXTURE_PATH").map(PathBuf::from);

        if sanity_project_id.is_none() && fixture_path.is_none() {
            bail!("either SANITY_PROJECT_ID or CMS_FIXTURE_PATH must be set");
        }

        let revalidate_secret = non_empty_var("REVALIDATE_SECRET");

        let revalidate_ttl_secs = env::var("REVALIDATE_TTL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("REVALIDATE_TTL_SECS must be a valid u64")?;

        let studio_username = non_empty_var("STUDIO_USERNAME");
        let studio_password = non_empty_var("STUDIO_PASSWORD");
        let studio_url = non_empty_var("STUDIO_URL");

        let templates_dir = env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./templates"));

        Ok(Self {
            port,
            site_url,
            sanity_project_id,
            sanity_dataset,
            sanity_api_version,
            sanity_use_cdn,
            sanity_api_token,
            sanity_timeout_secs,
            fixture_path,
            revalidate_secret,
            revalidate_ttl_secs,
            studio_username,
            studio_password,
            studio_url,
            templates_dir,
        })
    }

    /// Project ID used when building image CDN URLs.
    ///
    /// Fixture-backed runs without a project fall back to `local`.
    pub fn image_project_id(&self) -> &str {
        self.sanity_project_id.as_deref().unwrap_or("local")
    }
}

/// Read an environment variable, treating blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
