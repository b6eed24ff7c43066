//! comfy-core - Core traits and types for the ComfyUI gateway
//!
//! This crate provides the abstraction that lets the HTTP layer forward
//! requests to a workflow execution backend without knowing how the backend
//! is reached.

pub mod backend;
pub mod error;
pub mod models;

pub use backend::{QueueProbe, WorkflowBackend};
pub use error::{BackendError, BackendResult};
pub use models::*;
