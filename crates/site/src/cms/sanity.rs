//! HTTP client for the Sanity query API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::groq::GroqQuery;
use super::{CmsError, ContentQuery, ContentStore};
use crate::config::Config;

/// Longest upstream error body kept in [`CmsError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for a Sanity project.
#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
    pub timeout: Duration,
    /// Overrides the project API host, e.g. for a local mock server.
    pub api_host: Option<String>,
}

impl SanityConfig {
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            token: None,
            timeout: Duration::from_secs(10),
            api_host: None,
        }
    }

    /// Settings from the application config; `None` without a project id.
    pub fn from_config(config: &Config) -> Option<Self> {
        let project_id = config.sanity_project_id.clone()?;
        Some(Self {
            project_id,
            dataset: config.sanity_dataset.clone(),
            api_version: config.sanity_api_version.clone(),
            use_cdn: config.sanity_use_cdn,
            token: config.sanity_api_token.clone(),
            timeout: Duration::from_secs(config.sanity_timeout_secs),
            api_host: None,
        })
    }

    /// Query endpoint URL.
    pub fn endpoint(&self) -> String {
        let host = match &self.api_host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => {
                let subdomain = if self.use_cdn { "apicdn" } else { "api" };
                format!("https://{}.{subdomain}.sanity.io", self.project_id)
            }
        };
        let version = self.api_version.trim_start_matches('v');
        format!("{host}/v{version}/data/query/{}", self.dataset)
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Option<Value>,
}

/// Content store backed by the Sanity HTTP API.
#[derive(Clone)]
pub struct SanityStore {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl SanityStore {
    pub fn new(config: SanityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: config.endpoint(),
            token: config.token,
        }
    }

    /// Execute a raw GROQ query.
    pub async fn query(&self, groq: &GroqQuery) -> Result<Value, CmsError> {
        let mut request = self.client.post(&self.endpoint).json(groq);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            return Err(CmsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))?;
        Ok(parsed.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl ContentStore for SanityStore {
    async fn fetch(&self, query: &ContentQuery) -> Result<Value, CmsError> {
        let started = Instant::now();
        let result = self.query(&GroqQuery::build(query)).await;
        debug!(
            kind = query.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "sanity query"
        );
        result
    }

    fn backend(&self) -> &'static str {
        "sanity"
    }
}
