//! RWANA Offline Cache - an offline-first caching proxy
//!
//! Sits in front of the RWANA Health Voice Assistant and serves cached assets
//! when the application or the CDN cannot be reached.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rwana_offline_cache::api::create_router;
use rwana_offline_cache::{AppState, Config};

/// Main entry point for the offline cache proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the worker with an HTTP fetcher for the upstream origin
/// 4. Install and activate the current cache generation (unless disabled)
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rwana_offline_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RWANA offline cache proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, cache_name={}, port={}, max_entry_bytes={}",
        config.upstream_url, config.cache_name, config.server_port, config.max_entry_bytes
    );

    let state = AppState::from_config(&config).context("Failed to create offline worker")?;

    if config.install_on_startup {
        // A failed install leaves the proxy usable: requests still pass
        // through and same-origin responses are cached as they arrive.
        match state.worker.install().await {
            Ok(report) => {
                info!("Installed {} manifest entries", report.cached.len());
                state.worker.activate().await;
            }
            Err(e) => error!("Install failed, serving without a seeded cache: {}", e),
        }
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
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
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
