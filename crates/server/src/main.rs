use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wavswap_core::{
    load_config, validate_config, AssetStore, AudioConverter, ConversionService,
    FfmpegConverter, FsAssetStore, Janitor,
};
use wavswap_server::{create_router, AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("WAVSWAP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("wavswap.toml"));

    // Load configuration before logging so `server.debug` can pick the filter
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    let default_filter = if config.server.debug {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("wavswap {} starting", VERSION);
    info!("Configuration loaded from {:?}", config_path);

    validate_config(&config).context("Configuration validation failed")?;

    info!("Upload directory: {:?}", config.storage.upload_dir);
    info!("Download directory: {:?}", config.storage.download_dir);

    // Storage areas
    let store = Arc::new(FsAssetStore::new(&config.storage));
    store
        .init()
        .await
        .context("Failed to create storage directories")?;

    // Conversion engine
    let converter = Arc::new(FfmpegConverter::new(config.converter.clone()));
    if converter.is_available().await {
        info!("FFmpeg is installed and working");
    } else {
        warn!(
            "FFmpeg is not installed or not in PATH ({:?})",
            converter.ffmpeg_path()
        );
    }

    let service = Arc::new(ConversionService::new(converter, store.clone()));

    // Janitor: one sweep now, then periodically
    let janitor = Arc::new(Janitor::from_config(store, &config.storage));
    let report = janitor.sweep().await;
    info!(
        removed = report.removed_count(),
        failed = report.failed,
        "Startup sweep finished"
    );
    janitor.start().await;

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        service,
        Arc::clone(&janitor),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    janitor.stop().await;
    info!("Janitor stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
