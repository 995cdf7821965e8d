//! Caching Proxy - A forward HTTP proxy with a bounded response cache
//!
//! Usage: `caching_proxy [port]`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caching_proxy::{
    create_router, serve, AppState, CacheStore, Config, ProxyPipeline, TcpOriginFetcher,
};

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables and arguments
/// 3. Create the shared cache store
/// 4. Start the admin API in the background
/// 5. Run the proxy accept loop until SIGINT/SIGTERM
/// 6. Release every cached entry and stop the admin API
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caching_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting caching proxy");

    let config = Config::from_env().with_args(std::env::args());
    info!(
        "Configuration loaded: capacity={}, default_max_age={}s, proxy_port={}, admin_port={}, origin_timeout={}s, client_timeout={}s",
        config.cache_capacity,
        config.default_max_age,
        config.proxy_port,
        config.admin_port,
        config.origin_timeout,
        config.client_timeout
    );

    let cache = Arc::new(RwLock::new(CacheStore::new(
        config.cache_capacity,
        config.default_max_age,
    )));

    let proxy_addr = SocketAddr::from(([0, 0, 0, 0], config.proxy_port));
    let proxy_listener = TcpListener::bind(proxy_addr)
        .await
        .with_context(|| format!("failed to bind proxy port {}", config.proxy_port))?;

    let admin_addr = SocketAddr::from(([0, 0, 0, 0], config.admin_port));
    let admin_listener = TcpListener::bind(admin_addr)
        .await
        .with_context(|| format!("failed to bind admin port {}", config.admin_port))?;
    info!("Admin API listening on http://{}", admin_addr);

    let (stop_admin, admin_stopped) = oneshot::channel::<()>();
    let app = create_router(AppState::new(cache.clone()));
    let admin = tokio::spawn(async move {
        let result = axum::serve(admin_listener, app)
            .with_graceful_shutdown(async {
                let _ = admin_stopped.await;
            })
            .await;
        if let Err(e) = result {
            error!("Admin API failed: {}", e);
        }
    });

    let pipeline = ProxyPipeline::new(
        cache.clone(),
        TcpOriginFetcher::new(config.origin_timeout()),
    );

    tokio::select! {
        _ = serve(proxy_listener, pipeline, config.client_timeout()) => {}
        _ = shutdown_signal() => {}
    }

    let released = cache.write().await.clear();
    info!("Released {} cached responses", released);

    let _ = stop_admin.send(());
    admin.await.context("admin API task panicked")?;

    info!("Proxy shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed is logged and never fires.
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
