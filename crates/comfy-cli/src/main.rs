//! comfy-cli - Operator tools for the ComfyUI gateway
//!
//! `check` talks to ComfyUI directly; `smoke` drives a running gateway
//! through health, execute, status and queue.

mod commands;
mod gateway;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_client::ComfyClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::gateway::GatewayClient;
use crate::output::OutputContext;

#[derive(Parser)]
#[command(name = "comfy-cli")]
#[command(author, version, about = "ComfyUI gateway operator tools")]
#[command(propagate_version = true)]
struct Cli {
    /// Gateway URL
    #[arg(
        short,
        long,
        env = "COMFY_GATEWAY_URL",
        default_value = "http://localhost:8000"
    )]
    server: String,

    /// ComfyUI base URL
    #[arg(long, env = "COMFYUI_BASE_URL", default_value = "http://localhost:8188")]
    comfyui_base_url: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    request_timeout: u64,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that ComfyUI answers GET /queue and print its queue
    Check,

    /// Run health, execute, status and queue against a running gateway
    Smoke {
        /// Workflow JSON file (a bare workflow or a full submission)
        #[arg(short, long)]
        workflow: Option<PathBuf>,

        /// Client id sent with the submission
        #[arg(long, default_value = "smoke_client")]
        client_id: String,

        /// Seconds to wait between execute and status
        #[arg(long, default_value_t = 2)]
        wait: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let ctx = OutputContext::new(cli.no_color, cli.quiet);
    let timeout = Duration::from_secs(cli.request_timeout);

    match &cli.command {
        Commands::Check => {
            let client = ComfyClient::with_timeout(&cli.comfyui_base_url, timeout)
                .context("Failed to create ComfyUI client")?;
            commands::check(&client, &ctx).await?;
        }

        Commands::Smoke {
            workflow,
            client_id,
            wait,
        } => {
            let gateway = create_gateway(&cli.server, timeout)?;
            let submission = commands::load_submission(workflow.as_deref(), client_id)?;
            commands::smoke(&gateway, &submission, Duration::from_secs(*wait), &ctx).await?;
        }
    }

    Ok(())
}

/// Create a gateway client for the given server URL
fn create_gateway(server: &str, timeout: Duration) -> Result<GatewayClient> {
    GatewayClient::new(server, timeout).context("Failed to create gateway client")
}
