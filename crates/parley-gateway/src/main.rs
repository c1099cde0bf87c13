//! # parley-gateway
//!
//! Chat gateway binary — bridges a browser chat client to an upstream
//! multi-agent orchestrator, translating its streamed status updates into
//! a simplified SSE stream of chat messages.

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_server::config::{ServerConfig, UpstreamConfig};
use parley_server::server::ParleyServer;

/// Parley chat gateway.
#[derive(Parser, Debug)]
#[command(
    name = "parley-gateway",
    about = "Chat gateway bridging browser clients to an A2A orchestrator"
)]
struct Cli {
    /// Host to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind (0 for auto-assign).
    #[arg(long, default_value = "9130")]
    port: u16,

    /// Upstream agent gateway address.
    #[arg(long, default_value = "http://localhost:10001")]
    upstream_url: String,

    /// Substring identifying the orchestrating agent in routing annotations.
    #[arg(long, default_value = "person_a")]
    orchestrator: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    let upstream = UpstreamConfig {
        url: args.upstream_url,
        orchestrator: args.orchestrator,
    };

    let server = ParleyServer::new(config, &upstream);
    let (addr, handle) = server.listen().await.context("failed to bind server")?;
    tracing::info!(upstream = %upstream.url, "parley gateway ready on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    tracing::info!("shutting down");
    server.shutdown().graceful_shutdown(handle, None).await;
    Ok(())
}
