//! Telegram online status server entry point.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tg_presence::api::{create_router, AppState};
use tg_presence::cache::CacheStore;
use tg_presence::config::Config;
use tg_presence::metrics;
use tg_presence::presence::TelegramPresence;
use tg_presence::status::StatusService;
use tg_presence::utils::shutdown_signal;

/// Public API reporting whether a Telegram account was recently online.
#[derive(Parser, Debug)]
#[command(name = "tg-presence")]
#[command(about = "Serve the recently-online status of a Telegram account over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Path to the configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP port, overriding the configuration file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("tg_presence=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load_with_env(args.config).map_err(|e| {
        error!("Application initialization failed! {}", e);
        e
    })?;

    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Connect upstream
    let telegram = TelegramPresence::connect(&config).await.map_err(|e| {
        error!("Failed to start Telegram client: {}", e);
        e
    })?;

    if !telegram.is_authorized().await? {
        warn!(
            "Session {} is not authorized; /data will fail until tg-presence-setup is run",
            telegram.session_path().display()
        );
    }

    let store = CacheStore::new(config.storage.cache.clone());
    let service = StatusService::new(store, Arc::new(telegram));

    let mut state = AppState::new(service);
    match metrics::install() {
        Ok(handle) => state = state.with_metrics(handle),
        Err(e) => warn!("Metrics disabled: {}", e),
    }

    // Start HTTP server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on http://{}/data", addr);
    info!("Cache file: {}", config.storage.cache.display());

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
