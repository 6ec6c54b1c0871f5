//! Clinicq Daemon - Main Entry Point
//! Queue engine behind a JSON-RPC server

mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use clinicq_api_rpc::{RpcServer, RpcServerConfig};
use clinicq_core::application::{QueueRegistry, QueueService, RegistryConfig};
use clinicq_core::port::time_provider::SystemTimeProvider;
use settings::{DaemonConfig, LogFormat};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const LOG_FILE_PREFIX: &str = "clinicq.log";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (file + env)
    let cfg = DaemonConfig::load()?;

    // 2. Initialize logging; the guard flushes the file writer on drop
    let _log_guard = init_logging(&cfg)?;

    info!("Clinicq queue engine v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let registry = Arc::new(
        QueueRegistry::new(
            RegistryConfig {
                default_average_wait_minutes: cfg.default_average_wait_minutes,
                allow_implicit_departments: !cfg.strict_departments,
            },
            time_provider.clone(),
        )
        .context("Invalid registry configuration")?,
    );

    for department in &cfg.departments {
        registry
            .register(department)
            .with_context(|| format!("Cannot register department {:?}", department))?;
    }
    info!(
        departments = registry.len(),
        strict = !registry.config().allow_implicit_departments,
        default_average_wait_minutes = registry.config().default_average_wait_minutes,
        "Departments registered"
    );

    let service = Arc::new(QueueService::new(registry, time_provider));

    // 4. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: cfg.rpc_host.clone(),
        port: cfg.rpc_port,
    };
    let (addr, rpc_handle) = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %addr, "System ready. Waiting for check-ins...");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}

/// Console logging (pretty or JSON) plus optional rolling JSON file output
fn init_logging(cfg: &DaemonConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("clinicq=info"))
        .context("Failed to create env filter")?;

    let (file_layer, guard) = match &cfg.log_dir {
        Some(dir) => {
            let dir = shellexpand::tilde(dir).into_owned();
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().json().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    match cfg.log_format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(guard)
}
