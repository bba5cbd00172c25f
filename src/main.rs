//! Dashboard reverse proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ http server ─▶ rule table ─▶ rewriter      │
//!                         │        │                          │         │
//!                         │        ▼ (no rule)                ▼         │
//!                         │   SPA fallback              forwarder ──────┼──▶ Upstream
//!                         │                                   │         │
//!     Client Response     │                                   ▼         │
//!     ◀───────────────────┼──────────────────────────── post-process ◀──┼─── Upstream
//!                         └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use dashboard_proxy::config::load_or_default;
use dashboard_proxy::lifecycle::{spawn_signal_handler, Shutdown};
use dashboard_proxy::observability::{logging, metrics};
use dashboard_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "dashboard-proxy")]
#[command(about = "Path-routed reverse proxy for the market dashboard", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in dashboard rules are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!("dashboard-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        rules = config.rules.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.wait()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
