//! Portico server - local HTTP automation server for project scaffolding
//! and AI-provider forwarding.

use anyhow::Result;
use clap::Parser;
use portico_server::{activity, config::Config, logging, router, state::AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use logging::{LogConfig, LogFormat};

/// Portico server - project scaffolding and AI forwarding for one machine.
#[derive(Parser, Debug)]
#[command(name = "portico-server")]
#[command(about = "Local automation server for project scaffolding and AI forwarding")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override port from config
    #[arg(short, long)]
    port: Option<u16>,

    /// Override archive directory from config
    #[arg(long, value_name = "DIR")]
    archive_dir: Option<PathBuf>,

    /// Enable debug logging (DEBUG level for all targets)
    #[arg(short, long)]
    debug: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "archive=debug").
    /// Can be specified multiple times. Targets are prefixed with "portico::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(cli.debug, cli.quiet, cli.log_overrides, cli.log_format);
    logging::init(&log_config);

    // Load configuration, then apply CLI overrides.
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dir) = cli.archive_dir {
        config.archive_dir = dir;
    }

    tracing::info!(
        target: "portico::startup",
        "Loaded configuration (port: {}, archive: {})",
        config.port,
        config.archive_dir.display()
    );

    let state = Arc::new(AppState::new(config.clone())?);
    tracing::info!(target: "portico::startup", "Initialized application state");

    // Arm the inactivity watchdog; it resolves the graceful-shutdown future.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    activity::spawn_idle_watchdog(state.clone(), shutdown_tx);
    tracing::info!(
        target: "portico::startup",
        "Idle shutdown armed ({}s timeout)",
        state.config.idle_timeout_secs
    );

    let app = router::build(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!(target: "portico::startup", "Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await?;

    tracing::info!(target: "portico::startup", "Server stopped");
    Ok(())
}
