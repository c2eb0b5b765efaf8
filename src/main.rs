//! Storefront Cache - cached catalog client and gateway
//!
//! Serves the storefront catalog from an in-memory response cache in front
//! of the remote REST API.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_cache::api::{create_router, AppState};
use storefront_cache::Config;

/// Main entry point for the catalog gateway.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cached catalog client
/// 4. Start the cache monitor when diagnostics are enabled
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storefront catalog gateway");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api_base_url={}, cache_max_size={}, cache_ttl={}s, diagnostics={}, port={}",
        config.api_base_url,
        config.cache_max_size,
        config.cache_ttl,
        config.cache_diagnostics,
        config.server_port
    );
    if config.api_token.is_none() {
        warn!("API_TOKEN not set, admin routes will be rejected");
    }

    let state = AppState::from_config(&config).context("failed to create catalog client")?;
    info!("Response cache initialized");

    let monitor_handle = state.api.diagnostics().map(|diag| {
        info!("Cache diagnostics enabled, mounting /debug/cache routes");
        diag.monitor()
    });

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(monitor_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the monitor task if one is running.
async fn shutdown_signal(monitor_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = monitor_handle {
        handle.abort();
        warn!("Cache monitor aborted");
    }
}
