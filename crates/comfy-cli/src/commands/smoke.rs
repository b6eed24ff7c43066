//! Smoke command - end-to-end run against a live gateway

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::gateway::GatewayClient;
use crate::output::OutputContext;

/// What each smoke step returned
#[derive(Debug)]
pub struct SmokeReport {
    pub executed: Value,
    /// `None` when execute returned no `prompt_id`
    pub status: Option<Value>,
    pub queue: Value,
}

/// Build the execute body from an optional workflow file.
///
/// The file may hold either a bare workflow graph or a full
/// `{"workflow": ..., "client_id": ...}` submission. Without a file a
/// one-node workflow is used.
pub fn load_submission(path: Option<&Path>, client_id: &str) -> Result<Value> {
    let document = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read workflow file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Workflow file {} is not JSON", path.display()))?
        }
        None => default_workflow(),
    };
    Ok(into_submission(document, client_id))
}

fn default_workflow() -> Value {
    json!({
        "1": {
            "class_type": "EmptyLatentImage",
            "inputs": {"width": 64, "height": 64, "batch_size": 1}
        }
    })
}

/// Wrap a bare workflow; keep a client id already present in a submission
fn into_submission(document: Value, client_id: &str) -> Value {
    let mut submission = match document {
        Value::Object(map) if map.contains_key("workflow") => map,
        workflow => {
            let mut map = Map::new();
            map.insert("workflow".to_string(), workflow);
            map
        }
    };
    submission
        .entry("client_id")
        .or_insert_with(|| Value::String(client_id.to_string()));
    Value::Object(submission)
}

/// Run health, execute, status and queue in order, stopping at the first non-200
pub async fn smoke(
    gateway: &GatewayClient,
    submission: &Value,
    wait: Duration,
    ctx: &OutputContext,
) -> Result<SmokeReport> {
    ctx.info("[1/4] health");
    let health = gateway.health().await?.expect_ok("health")?;
    ctx.success(&format!("healthy: {}", health));

    ctx.info("[2/4] execute");
    let executed = gateway.execute(submission).await?.expect_ok("execute")?;
    ctx.json(&executed);

    let status = match executed.get("prompt_id").and_then(Value::as_str) {
        Some(prompt_id) => {
            ctx.info(&format!("[3/4] status {} (after {:?})", prompt_id, wait));
            tokio::time::sleep(wait).await;
            let status = gateway.status(prompt_id).await?.expect_ok("status")?;
            ctx.json(&status);
            Some(status)
        }
        None => {
            ctx.warn("[3/4] status skipped: execute returned no prompt_id");
            None
        }
    };

    ctx.info("[4/4] queue");
    let queue = gateway.queue().await?.expect_ok("queue")?;
    ctx.json(&queue);

    ctx.success("Smoke run passed");
    Ok(SmokeReport {
        executed,
        status,
        queue,
    })
}
