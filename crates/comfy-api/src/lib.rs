//! comfy-api - HTTP API layer for the ComfyUI gateway
//!
//! This crate exposes the gateway's client-facing routes. Handlers forward
//! through the [`WorkflowBackend`](comfy_core::WorkflowBackend) trait held in
//! [`AppState`] and translate backend failures into [`ApiError`] responses.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use comfy_api::{create_router, AppState};
//! use comfy_client::ComfyClient;
//!
//! let client = ComfyClient::with_timeout("http://localhost:8188", timeout)?;
//! let router = create_router(AppState::new(Arc::new(client)));
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, FieldViolation};
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Workflows are opaque and may inline large inputs (e.g. base64 images)
        .route(
            "/api/workflow/execute",
            post(handlers::workflow::execute_workflow).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/workflow/status/{prompt_id}",
            get(handlers::workflow::get_workflow_status),
        )
        .route(
            "/api/workflow/interrupt",
            post(handlers::workflow::interrupt_workflow),
        )
        .route("/api/workflow/queue", get(handlers::workflow::get_queue_status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
