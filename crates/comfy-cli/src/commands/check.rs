//! Check command - ComfyUI reachability and queue

use anyhow::{bail, Context, Result};
use comfy_client::{ComfyClient, QueueProbe};
use serde_json::Value;

use crate::output::OutputContext;

/// Check ComfyUI's `/queue` and print the queue payload
pub async fn check(client: &ComfyClient, ctx: &OutputContext) -> Result<Value> {
    ctx.info(&format!("Checking ComfyUI at {}...", client.base_url()));

    if let QueueProbe::Unreachable { reason } = client.check_queue().await {
        bail!("ComfyUI at {} is unreachable: {}", client.base_url(), reason);
    }

    let queue = client
        .get_queue()
        .await
        .context("Failed to read ComfyUI queue")?;

    ctx.success("ComfyUI is reachable");
    ctx.json(&queue);

    Ok(queue)
}
