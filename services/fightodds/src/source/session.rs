//! Per-run HTTP context shared by every remote call

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

use crate::config::SourceConfig;
use crate::error::SourceError;

/// HTTP client plus pacing policy for one remote site.
///
/// Built once per run and borrowed by every fetch. Calls are sequential and
/// each one waits `request_delay` first.
pub struct FetchSession {
    client: reqwest::Client,
    base_url: Url,
    request_delay: Duration,
}

impl FetchSession {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL: {}", config.base_url))?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            request_delay: config.request_delay(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a site path, with query parameters
    pub fn url_for(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| SourceError::fetch(path, e))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    /// GET a page body as text
    pub async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| SourceError::fetch(url, e))
    }
}

/// Resolve an href found on a page against the site base
pub fn absolutize(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}
