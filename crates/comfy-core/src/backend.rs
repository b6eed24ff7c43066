//! WorkflowBackend trait - the seam between request handlers and the engine

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendResult;
use crate::models::PromptRequest;

/// Outcome of the health probe against the backend queue endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueProbe {
    /// Queue endpoint answered 200 within the timeout
    Reachable,
    /// Anything else; the reason is kept for logging
    Unreachable { reason: String },
}

impl QueueProbe {
    pub fn is_reachable(&self) -> bool {
        matches!(self, QueueProbe::Reachable)
    }
}

/// A workflow execution backend reached by the gateway.
///
/// Each method performs exactly one outbound call bounded by the backend's
/// configured timeout. Implementations never retry.
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// Probe `GET /queue`; never fails, only reports reachability
    async fn probe_queue(&self) -> QueueProbe;

    /// Submit a workflow (`POST /prompt`) and return the backend's JSON verbatim
    async fn submit(&self, request: &PromptRequest) -> BackendResult<Value>;

    /// Fetch execution history for a prompt (`GET /history/{prompt_id}`)
    async fn history(&self, prompt_id: &str) -> BackendResult<Value>;

    /// Interrupt the running workflow (`POST /interrupt`); the response body is discarded
    async fn interrupt(&self) -> BackendResult<()>;

    /// Fetch the full queue payload (`GET /queue`)
    async fn queue(&self) -> BackendResult<Value>;
}
