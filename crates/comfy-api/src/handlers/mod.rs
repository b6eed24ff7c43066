//! HTTP request handlers for the gateway API
//!
//! These handlers use the WorkflowBackend trait and are backend-agnostic.

pub mod health;
pub mod workflow;
