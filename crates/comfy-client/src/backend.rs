//! WorkflowBackend implementation that forwards over HTTP via `ComfyClient`

use async_trait::async_trait;
use comfy_core::{BackendError, BackendResult, PromptRequest, QueueProbe, WorkflowBackend};
use serde_json::Value;

use crate::client::ComfyClient;
use crate::error::ComfyClientError;

/// Map a ComfyClientError to a BackendError
fn map_err(e: ComfyClientError) -> BackendError {
    match e {
        ComfyClientError::Timeout => BackendError::Timeout,
        ComfyClientError::ServerError { status, body } => BackendError::Status { status, body },
        ComfyClientError::ParseError(m) => BackendError::MalformedResponse(m),
        ComfyClientError::ConnectionFailed(m) => BackendError::Unavailable(m),
        other => BackendError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl WorkflowBackend for ComfyClient {
    async fn probe_queue(&self) -> QueueProbe {
        self.check_queue().await
    }

    async fn submit(&self, request: &PromptRequest) -> BackendResult<Value> {
        self.submit_prompt(request).await.map_err(map_err)
    }

    async fn history(&self, prompt_id: &str) -> BackendResult<Value> {
        self.get_history(prompt_id).await.map_err(map_err)
    }

    async fn interrupt(&self) -> BackendResult<()> {
        ComfyClient::interrupt(self).await.map_err(map_err)
    }

    async fn queue(&self) -> BackendResult<Value> {
        self.get_queue().await.map_err(map_err)
    }
}
