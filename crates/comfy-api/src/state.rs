//! Application state for the gateway API

use std::sync::Arc;

use comfy_core::WorkflowBackend;

/// Application state shared across all handlers.
///
/// Immutable after construction; every request only reads it.
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn WorkflowBackend>,
}

impl AppState {
    /// Create a new AppState forwarding to the given backend
    pub fn new(backend: Arc<dyn WorkflowBackend>) -> Self {
        Self { backend }
    }

    /// Get the backend
    pub fn backend(&self) -> &dyn WorkflowBackend {
        self.backend.as_ref()
    }
}
