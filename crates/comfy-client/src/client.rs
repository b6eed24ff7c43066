//! ComfyUI HTTP Client implementation

use std::time::Duration;

use comfy_core::{PromptRequest, QueueProbe};
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ComfyClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// ComfyUI job-queue API client
///
/// Every call is a single attempt bounded by the timeout given at
/// construction. There is no retry.
#[derive(Debug, Clone)]
pub struct ComfyClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl ComfyClient {
    /// Create a new client with the default timeout
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the ComfyUI server (e.g., "http://localhost:8188")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a new client whose calls are bounded by `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ComfyClientError::CannotBeABase(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build `{base}/{segments...}`, keeping any path prefix on the base URL.
    ///
    /// Segments are percent-encoded, so an opaque prompt id always stays a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ComfyClientError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =========================================================================
    // Health Probe
    // =========================================================================

    /// Probe `GET /queue`.
    ///
    /// Reachable only when the call completes in time with exactly 200; the
    /// body is ignored. Never returns an error.
    #[instrument(skip(self))]
    pub async fn check_queue(&self) -> QueueProbe {
        let url = match self.endpoint(&["queue"]) {
            Ok(url) => url,
            Err(e) => {
                return QueueProbe::Unreachable {
                    reason: e.to_string(),
                }
            }
        };

        match self.client.get(url).send().await {
            Ok(response) if response.status() == StatusCode::OK => QueueProbe::Reachable,
            Ok(response) => QueueProbe::Unreachable {
                reason: format!("HTTP {}", response.status()),
            },
            Err(e) => QueueProbe::Unreachable {
                reason: ComfyClientError::from_transport(e).to_string(),
            },
        }
    }

    // =========================================================================
    // Job Queue Operations
    // =========================================================================

    /// Submit a workflow via `POST /prompt`
    #[instrument(skip(self, request), fields(client_id = %request.client_id))]
    pub async fn submit_prompt(&self, request: &PromptRequest) -> Result<Value> {
        let url = self.endpoint(&["prompt"])?;
        debug!("Submitting prompt to {}", url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ComfyClientError::from_transport)?;
        self.handle_response(response).await
    }

    /// Fetch execution history for a prompt via `GET /history/{prompt_id}`
    #[instrument(skip(self))]
    pub async fn get_history(&self, prompt_id: &str) -> Result<Value> {
        let url = self.endpoint(&["history", prompt_id])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ComfyClientError::from_transport)?;
        self.handle_response(response).await
    }

    /// Interrupt the running workflow via `POST /interrupt`.
    ///
    /// The request has an empty body and the response body is discarded.
    #[instrument(skip(self))]
    pub async fn interrupt(&self) -> Result<()> {
        let url = self.endpoint(&["interrupt"])?;

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(ComfyClientError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.extract_error(response, status).await)
        }
    }

    /// Fetch the full queue payload via `GET /queue`
    #[instrument(skip(self))]
    pub async fn get_queue(&self) -> Result<Value> {
        let url = self.endpoint(&["queue"])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ComfyClientError::from_transport)?;
        self.handle_response(response).await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Handle response and parse the JSON body verbatim
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .bytes()
                .await
                .map_err(ComfyClientError::from_transport)?;
            serde_json::from_slice(&body).map_err(|e| ComfyClientError::ParseError(e.to_string()))
        } else {
            Err(self.extract_error(response, status).await)
        }
    }

    /// Extract error from failed response
    async fn extract_error(&self, response: Response, status: StatusCode) -> ComfyClientError {
        // A body that cannot be read still yields a status error
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), %body, "Backend returned error status");
        ComfyClientError::server_error(status.as_u16(), body)
    }
}
