//! Workflow handlers: execute, status, interrupt, queue
//!
//! Each handler makes exactly one backend call. Successful JSON bodies are
//! passed through unchanged; failures go through [`ApiError::from_backend`].

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use comfy_core::{BackendError, Operation, PromptRequest, WorkflowSubmission};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, FieldViolation};
use crate::state::AppState;

/// Response for POST /api/workflow/interrupt
#[derive(Debug, Serialize)]
pub struct InterruptResponse {
    pub message: &'static str,
}

/// Log a failed backend call and translate it
fn backend_failure(operation: Operation, err: BackendError) -> ApiError {
    tracing::error!(operation = %operation, error = %err, "Backend call failed");
    ApiError::from_backend(operation, err)
}

/// Parse and shape-check an execute request body.
///
/// Only the envelope is checked: `workflow` must be an object and
/// `client_id`, if present and not null, a string. The graph itself is
/// never inspected. All violations are reported together.
pub fn parse_submission(body: &[u8]) -> Result<WorkflowSubmission, ApiError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ApiError::Validation(vec![FieldViolation::new(
            &["body"],
            format!("JSON decode error: {}", e),
            "json_invalid",
        )])
    })?;

    let Value::Object(mut fields) = value else {
        return Err(ApiError::Validation(vec![FieldViolation::new(
            &["body"],
            "Input should be a valid dictionary",
            "dict_type",
        )]));
    };

    let mut violations = Vec::new();

    let workflow = match fields.remove("workflow") {
        Some(Value::Object(graph)) => Some(graph),
        Some(_) => {
            violations.push(FieldViolation::new(
                &["body", "workflow"],
                "Input should be a valid dictionary",
                "dict_type",
            ));
            None
        }
        None => {
            violations.push(FieldViolation::new(
                &["body", "workflow"],
                "Field required",
                "missing",
            ));
            None
        }
    };

    let client_id = match fields.remove("client_id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id),
        Some(_) => {
            violations.push(FieldViolation::new(
                &["body", "client_id"],
                "Input should be a valid string",
                "string_type",
            ));
            None
        }
    };

    match workflow {
        Some(workflow) if violations.is_empty() => {
            Ok(WorkflowSubmission::new(workflow, client_id))
        }
        _ => Err(ApiError::Validation(violations)),
    }
}

/// POST /api/workflow/execute
/// Submit a workflow; every call creates a new backend job
pub async fn execute_workflow(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let submission = parse_submission(&body)?;
    let request = PromptRequest::from(submission);

    tracing::info!(client_id = %request.client_id, "Executing workflow");

    let result = state.backend().submit(&request).await.map_err(|e| {
        tracing::error!(client_id = %request.client_id, error = %e, "Workflow execution failed");
        ApiError::from_backend(Operation::Execute, e)
    })?;

    let prompt_id = result
        .get("prompt_id")
        .and_then(Value::as_str)
        .unwrap_or("No ID");
    tracing::info!(%prompt_id, "Workflow execution successful");

    Ok(Json(result))
}

/// GET /api/workflow/status/:prompt_id
/// Backend history for one prompt; the id is forwarded as-is
pub async fn get_workflow_status(
    State(state): State<AppState>,
    Path(prompt_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let history = state
        .backend()
        .history(&prompt_id)
        .await
        .map_err(|e| backend_failure(Operation::Status, e))?;
    Ok(Json(history))
}

/// POST /api/workflow/interrupt
/// Interrupt the running workflow; the backend's reply body is not relayed
pub async fn interrupt_workflow(
    State(state): State<AppState>,
) -> Result<Json<InterruptResponse>, ApiError> {
    state
        .backend()
        .interrupt()
        .await
        .map_err(|e| backend_failure(Operation::Interrupt, e))?;

    Ok(Json(InterruptResponse {
        message: "Workflow interrupted successfully",
    }))
}

/// GET /api/workflow/queue
pub async fn get_queue_status(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let queue = state
        .backend()
        .queue()
        .await
        .map_err(|e| backend_failure(Operation::Queue, e))?;
    Ok(Json(queue))
}
