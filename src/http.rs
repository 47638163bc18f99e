//! Thin GET-only HTTP layer shared by both scraping phases.

use crate::error::ScrapeError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Default User-Agent; immoweb rejects the reqwest default.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Status code and body of a completed request.
///
/// Any status is a valid response here; callers decide what a non-200 means.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// GET requests against a remote site.
///
/// Implementations must be safe to share across concurrent workers.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpResponse, ScrapeError>;
}

/// Pooled reqwest client. Never retries.
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ScrapeError> {
        let transport = |e: reqwest::Error| ScrapeError::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();

        // Only 200 bodies are ever parsed; a broken body must not cost us the status.
        if status != 200 {
            debug!(%url, status, "GET complete, body skipped");
            return Ok(HttpResponse {
                status,
                body: String::new(),
            });
        }

        let body = response.text().await.map_err(transport)?;

        debug!(%url, status, bytes = body.len(), "GET complete");
        Ok(HttpResponse { status, body })
    }
}
