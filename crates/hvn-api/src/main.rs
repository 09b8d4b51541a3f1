//! # hvn-server entry point
//!
//! Development server over in-memory stores. Parses command-line
//! arguments, initializes tracing, wires the outbound notification queue,
//! and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hvn_api::state::AppState;
use hvn_notify::OutboundQueue;

/// Haven escrow & dispute API server.
#[derive(Parser, Debug)]
#[command(name = "hvn-server", version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Outbound notification queue capacity.
    #[arg(long, default_value_t = 256)]
    notify_queue: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let (queue, rx) = OutboundQueue::new(cli.notify_queue);
    OutboundQueue::spawn_log_drain(rx);

    let state = AppState::in_memory(Arc::new(queue));
    let app = hvn_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!(%addr, "hvn-server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
