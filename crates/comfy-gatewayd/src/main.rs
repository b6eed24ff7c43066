//! comfy-gatewayd - ComfyUI Gateway Daemon
//!
//! Stable HTTP surface in front of a ComfyUI execution engine. Accepts
//! workflow submissions, forwards them to the engine's job-queue API and
//! relays status, interrupt and queue information back.
//!
//! Usage:
//!   comfy-gatewayd [--comfyui-base-url URL] [--host HOST] [--port PORT]
//!                  [--request-timeout SECS]
//!
//! Every option can also be set through the environment
//! (`COMFYUI_BASE_URL`, `HOST`, `PORT`, `REQUEST_TIMEOUT`) or a `.env` file.

mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use comfy_api::{create_router, AppState};
use comfy_client::ComfyClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Args, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before clap reads the environment; a missing file is fine
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "comfy_gatewayd=info,comfy_api=info,comfy_client=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting comfy-gatewayd");

    let config = GatewayConfig::from_args(Args::parse())?;
    if config.is_placeholder_backend() {
        tracing::warn!(
            "COMFYUI_BASE_URL is not set, using placeholder {}",
            config.comfyui_base_url
        );
    }
    tracing::info!(
        backend = %config.comfyui_base_url,
        timeout_secs = config.request_timeout.as_secs(),
        "Forwarding to ComfyUI"
    );

    let client = ComfyClient::with_timeout(&config.comfyui_base_url, config.request_timeout)
        .context("Failed to create ComfyUI client")?;

    let app = create_router(AppState::new(Arc::new(client)));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("comfy-gatewayd stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
