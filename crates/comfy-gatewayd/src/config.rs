//! Gateway configuration
//!
//! Read once at startup from command-line flags, falling back to environment
//! variables (including a `.env` file) and then to built-in defaults.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

/// Placeholder backend URL; operators are expected to override it
pub const DEFAULT_COMFYUI_BASE_URL: &str = "http://your-hai-service-url";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(
    name = "comfy-gatewayd",
    version,
    about = "HTTP gateway in front of a ComfyUI execution engine"
)]
pub struct Args {
    /// Base URL of the ComfyUI server
    #[arg(long, env = "COMFYUI_BASE_URL", default_value = DEFAULT_COMFYUI_BASE_URL)]
    pub comfyui_base_url: String,

    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Timeout in seconds for every call to the ComfyUI server
    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout: u64,
}

/// Process-wide gateway configuration, immutable after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Backend base URL without a trailing `/`
    pub comfyui_base_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    /// Validate parsed arguments into a configuration
    pub fn from_args(args: Args) -> Result<Self> {
        let base = args.comfyui_base_url.trim_end_matches('/').to_string();
        let parsed = Url::parse(&base)
            .with_context(|| format!("Invalid COMFYUI_BASE_URL '{}'", args.comfyui_base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "COMFYUI_BASE_URL must use http or https, got '{}'",
                parsed.scheme()
            );
        }

        Ok(Self {
            comfyui_base_url: base,
            host: args.host,
            port: args.port,
            request_timeout: Duration::from_secs(args.request_timeout),
        })
    }

    /// Whether the backend URL is still the built-in placeholder
    pub fn is_placeholder_backend(&self) -> bool {
        self.comfyui_base_url == DEFAULT_COMFYUI_BASE_URL
    }
}
