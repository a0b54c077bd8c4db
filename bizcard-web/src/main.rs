//! bizcard-web - Employee business card directory
//!
//! Password-gated web service for importing, browsing and exporting
//! employee contact cards as vCards and QR codes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bizcard_common::api::hash_password;
use bizcard_common::config::{AppConfig, CliOverrides};
use bizcard_common::db::init_database;
use bizcard_web::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

/// Command-line arguments for bizcard-web
#[derive(Parser, Debug)]
#[command(name = "bizcard-web")]
#[command(about = "Employee business card directory")]
#[command(version)]
struct Args {
    /// Folder holding the directory database
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            root_folder: args.root_folder,
            host: args.host,
            port: args.port,
            config_file: args.config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting bizcard-web v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = AppConfig::resolve(&args.into()).context("Failed to resolve configuration")?;
    info!(?config, "Configuration resolved");

    let db_path = config.database_path();
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    info!("Database path: {}", db_path.display());

    let state = AppState::new(
        pool,
        hash_password(&config.password),
        config.inactivity_threshold(),
    );
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("bizcard-web listening on http://{}", address);
    info!("Health check: http://{}/health", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
