//! Dynamic Route Registry
//!
//! Serves HTTP endpoints that are defined at runtime through a management API
//! and persisted as JSON records, so they survive restarts.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 ROUTE REGISTRY                │
//!   POST /api/create   │  ┌─────────┐   ┌─────────┐   ┌────────────┐  │
//!   PUT  /api/update ──┼─▶│  api    │──▶│  store  │──▶│ routes/*.json│ │
//!                      │  └────┬────┘   └─────────┘   └────────────┘  │
//!                      │       ▼                                       │
//!                      │  ┌─────────┐   ┌─────────┐                    │
//!   GET /anything ─────┼─▶│ binder  │──▶│  table  │──▶ JSON response   │
//!                      │  └─────────┘   └─────────┘                    │
//!                      │                                               │
//!   GET /openapi.json ─┼─▶ store list → schema inference → document    │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_registry::config::{load_config, validate_config, ConfigError, RegistryConfig};
use route_registry::lifecycle::{signals, Shutdown};
use route_registry::observability::{logging, metrics};
use route_registry::HttpServer;

#[derive(Parser)]
#[command(name = "route-registry")]
#[command(about = "Serve HTTP endpoints defined at runtime", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the route records directory.
    #[arg(long)]
    routes_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RegistryConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(dir) = cli.routes_dir {
        config.storage.routes_dir = dir;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("route-registry v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes_dir = %config.storage.routes_dir.display(),
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Stored routes are bound before the listener exists.
    let server = HttpServer::bootstrap(config.clone()).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
