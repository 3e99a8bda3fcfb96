//! Handyman Emporium service.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client Request
//!   ───────────────▶ ┌────────────────────────────────────────────┐
//!                    │ request id → trace → headers → limits      │
//!                    │   → timeout → metrics → handler            │
//!                    └───────────────────────┬────────────────────┘
//!                                            ▼
//!                                  ┌───────────────────┐
//!                                  │ catalog::ItemStore │
//!                                  │  id → Item         │
//!                                  └───────────────────┘
//!
//!   Cross-cutting: config (TOML + CLI), observability (tracing, Prometheus),
//!   lifecycle (signals → graceful shutdown)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use emporium::config::{load_config, validate_config, ConfigError, EmporiumConfig};
use emporium::http::HttpServer;
use emporium::lifecycle::{signals, Shutdown};
use emporium::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "emporium")]
#[command(about = "Aron's Handyman Emporium: an HTTP catalog of tools and consumables", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Start with an empty catalog.
    #[arg(long)]
    no_seed: bool,
}

fn resolve_config(cli: &Cli) -> Result<EmporiumConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => EmporiumConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if cli.no_seed {
        config.catalog.seed_demo_items = false;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability.log_level);

    tracing::info!("emporium v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        seed_demo_items = config.catalog.seed_demo_items,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
