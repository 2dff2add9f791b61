//! Glyphcast ASCII Render Service - Main Entry Point

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use glyphcast_api_rpc::{server::RpcServerConfig, RpcServer};
use glyphcast_core::application::{ConvertService, ServiceStats};
use glyphcast_core::domain::CharRamp;
use glyphcast_core::port::id_provider::UuidProvider;
use glyphcast_core::port::time_provider::SystemTimeProvider;
use glyphcast_infra_fs::{FsArtifactStore, FsRecordStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DATA_DIR: &str = "~/.glyphcast/images";
const DEFAULT_RPC_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("GLYPHCAST_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("glyphcast=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Glyphcast render service v{} starting...", VERSION);

    // 2. Load configuration
    let data_dir = std::env::var("GLYPHCAST_DATA_DIR")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DATA_DIR).into_owned());

    let rpc_port: u16 = std::env::var("GLYPHCAST_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RPC_PORT);

    info!(data_dir = %data_dir, "Initializing image store...");

    // 3. Initialize storage
    let id_provider = Arc::new(UuidProvider);
    let artifacts = Arc::new(
        FsArtifactStore::open(&data_dir, id_provider)
            .await
            .map_err(|e| anyhow::anyhow!("Image store init failed: {}", e))?,
    );
    let records = Arc::new(FsRecordStore::new(&data_dir));

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let stats = Arc::new(ServiceStats::new());
    let service = Arc::new(ConvertService::new(
        artifacts,
        records,
        time_provider,
        stats,
        CharRamp::standard(),
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        port: rpc_port,
        ..Default::default()
    };
    let rpc_handle = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for uploads...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    // 7. Graceful shutdown (in-flight conversions die with the process)
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;

    info!("Shutdown complete.");

    Ok(())
}
