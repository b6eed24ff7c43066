//! Health check handler

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use comfy_core::QueueProbe;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfyui_service: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<&'static str>,
}

impl HealthResponse {
    fn healthy() -> Self {
        Self {
            status: "healthy",
            comfyui_service: Some("available"),
            detail: None,
        }
    }

    fn unhealthy() -> Self {
        Self {
            status: "unhealthy",
            comfyui_service: None,
            detail: Some("ComfyUI service unavailable"),
        }
    }
}

/// GET /health
/// Probe the backend queue; only the probe's status code matters
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.backend().probe_queue().await {
        QueueProbe::Reachable => (StatusCode::OK, Json(HealthResponse::healthy())),
        QueueProbe::Unreachable { reason } => {
            tracing::warn!(%reason, "ComfyUI service unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy()),
            )
        }
    }
}
