//! HTTP client for the gateway's own API

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Status and body of one gateway response
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

impl Reply {
    /// Fail unless the gateway answered 200
    pub fn expect_ok(self, step: &str) -> Result<Value> {
        if self.status != StatusCode::OK {
            bail!("{} failed with HTTP {}: {}", step, self.status.as_u16(), self.body);
        }
        Ok(self.body)
    }
}

/// Client for the gateway endpoints
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: Url,
}

impl GatewayClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url).context("Invalid gateway URL")?;
        if base_url.cannot_be_a_base() {
            bail!("Gateway URL cannot be a base: {}", base_url);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Gateway URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `GET /health`
    pub async fn health(&self) -> Result<Reply> {
        let url = self.endpoint(&["health"])?;
        self.send(self.client.get(url)).await
    }

    /// `POST /api/workflow/execute`
    pub async fn execute(&self, submission: &Value) -> Result<Reply> {
        let url = self.endpoint(&["api", "workflow", "execute"])?;
        self.send(self.client.post(url).json(submission)).await
    }

    /// `GET /api/workflow/status/{prompt_id}`
    pub async fn status(&self, prompt_id: &str) -> Result<Reply> {
        let url = self.endpoint(&["api", "workflow", "status", prompt_id])?;
        self.send(self.client.get(url)).await
    }

    /// `GET /api/workflow/queue`
    pub async fn queue(&self) -> Result<Reply> {
        let url = self.endpoint(&["api", "workflow", "queue"])?;
        self.send(self.client.get(url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Reply> {
        let response = request.send().await.context("Gateway request failed")?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .context("Failed to read gateway response")?;
        debug!(status = status.as_u16(), len = bytes.len(), "Gateway replied");

        // Non-JSON bodies are kept as text so they can be reported
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Ok(Reply { status, body })
    }
}
