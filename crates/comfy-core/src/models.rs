//! Request models and operation vocabulary shared by the client and API layers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Client identifier forwarded when a submission does not carry one
pub const DEFAULT_CLIENT_ID: &str = "default_client";

/// Gateway operations that forward to the backend.
///
/// Used to label log events and to select the client-facing timeout message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Submit a workflow (`POST /prompt`)
    Execute,
    /// Fetch history for a prompt (`GET /history/{id}`)
    Status,
    /// Interrupt the running workflow (`POST /interrupt`)
    Interrupt,
    /// Fetch the full queue (`GET /queue`)
    Queue,
}

impl Operation {
    /// Short name used in log events
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Execute => "execute",
            Operation::Status => "status",
            Operation::Interrupt => "interrupt",
            Operation::Queue => "queue",
        }
    }

    /// Detail returned to the client when the backend call times out
    pub fn timeout_detail(&self) -> &'static str {
        match self {
            Operation::Execute => "ComfyUI service timeout",
            Operation::Status => "Status check timeout",
            Operation::Interrupt => "Interrupt timeout",
            Operation::Queue => "Queue status timeout",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated workflow submission.
///
/// The workflow graph is opaque: only its top-level shape (a JSON object)
/// is checked, never its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSubmission {
    /// Node graph interpreted solely by the backend
    pub workflow: Map<String, Value>,
    /// Caller-chosen client identifier
    pub client_id: Option<String>,
}

impl WorkflowSubmission {
    pub fn new(workflow: Map<String, Value>, client_id: Option<String>) -> Self {
        Self {
            workflow,
            client_id,
        }
    }

    /// The client identifier to forward; absent or empty falls back to [`DEFAULT_CLIENT_ID`]
    pub fn effective_client_id(&self) -> &str {
        self.client_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(DEFAULT_CLIENT_ID)
    }
}

/// Body sent to the backend's `POST /prompt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: Map<String, Value>,
    pub client_id: String,
}

impl From<WorkflowSubmission> for PromptRequest {
    fn from(submission: WorkflowSubmission) -> Self {
        let client_id = submission.effective_client_id().to_string();
        Self {
            prompt: submission.workflow,
            client_id,
        }
    }
}
