//! ComfyUI Client Library
//!
//! Provides a typed HTTP client for the job-queue API of a ComfyUI
//! execution engine, and the [`WorkflowBackend`](comfy_core::WorkflowBackend)
//! implementation the gateway forwards through.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use comfy_client::ComfyClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), comfy_client::ComfyClientError> {
//!     let client = ComfyClient::with_timeout("http://localhost:8188", Duration::from_secs(30))?;
//!
//!     if client.check_queue().await.is_reachable() {
//!         let queue = client.get_queue().await?;
//!         println!("{queue}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module serves an axum router on an ephemeral port and hands
//! back a client pointed at it:
//!
//! ```rust,ignore
//! use comfy_client::testing::TestServer;
//!
//! let server = TestServer::start(fake_comfyui_router()).await?;
//! let history = server.client.get_history("abc123").await?;
//! ```

mod backend;
mod client;
mod error;
pub mod testing;

pub use client::ComfyClient;
pub use error::{ComfyClientError, Result};

// Re-export core types for convenience
pub use comfy_core::{PromptRequest, QueueProbe};
