//! unhyped-api - Hype vs. reality service
//!
//! Accepts a poster or screenshot, identifies the film or series and returns
//! a Dutch-language verdict on whether the hype holds up.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};
use unhyped_common::config::{default_config_path, load_toml_config};
use unhyped_common::SystemClock;

use unhyped_api::config::{ServiceConfig, DEFAULT_LOG_FILTER};
use unhyped_api::AppState;

/// Command-line arguments for unhyped-api
#[derive(Parser, Debug)]
#[command(name = "unhyped-api")]
#[command(about = "Hype vs. reality analysis service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "UNHYPED_HOST")]
    host: String,

    /// Path to TOML config file
    #[arg(short, long, env = "UNHYPED_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let dotenv_path = dotenvy::dotenv().ok();

    let args = Args::parse();

    // Installed before config loading so its warnings are not lost;
    // the config file's level is applied once resolved
    let env_filter = EnvFilter::try_from_default_env().ok();
    let rust_log_set = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting unhyped-api v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Build: {} ({}, {})",
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = dotenv_path {
        info!("Loaded environment from {}", path.display());
    }

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    info!("Config file: {}", config_path.display());
    let toml_config = load_toml_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let config = ServiceConfig::resolve(&toml_config);
    if !rust_log_set {
        if let Err(e) = filter_handle.reload(EnvFilter::new(config.log_filter())) {
            warn!("Failed to apply configured log level: {}", e);
        }
    }
    info!(
        "Models: vision={}, analysis={}",
        config.models.vision, config.models.analysis
    );
    info!("API key present: {}", config.api_key.is_some());

    let state = AppState::from_config(&config, Arc::new(SystemClock))
        .context("Failed to initialize upstream client")?;
    let app = unhyped_api::build_router(state);

    let ip = args
        .host
        .parse()
        .with_context(|| format!("Invalid host address: {}", args.host))?;
    let addr = SocketAddr::new(ip, args.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
