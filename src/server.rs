//! HTTP server initialization and runtime setup.
//!
//! Builds the storage selected by [`StorageMode`], starts the cache sweeper,
//! and runs the Axum server until SIGINT or SIGTERM.

use crate::application::services::ShortenerService;
use crate::config::{Config, StorageMode};
use crate::domain::repositories::UrlStorage;
use crate::infrastructure::cache::{ExpiringCache, spawn_sweeper};
use crate::infrastructure::persistence::{PgUrlRepository, connect_pool};
use crate::infrastructure::storage::TieredStorage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Storage chosen at startup plus the sweeper that maintains its cache.
struct StorageRuntime {
    storage: Arc<dyn UrlStorage>,
    sweeper: Option<JoinHandle<()>>,
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (memory-only, or cache + PostgreSQL with migrations applied)
/// - Background cache sweeper (tiered mode)
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the sweeper is cancelled and joined before returning.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let shutdown = CancellationToken::new();

    let runtime = build_storage(&config, &shutdown).await?;

    let shortener = Arc::new(ShortenerService::new(runtime.storage));
    let state = AppState::new(shortener, config.base_url.clone());

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    // The server may also stop without a signal (e.g. listener error).
    shutdown.cancel();

    if let Some(handle) = runtime.sweeper {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Cache sweeper terminated abnormally");
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

async fn build_storage(config: &Config, shutdown: &CancellationToken) -> Result<StorageRuntime> {
    let cache = Arc::new(ExpiringCache::new());

    match config.storage {
        StorageMode::Memory => {
            // No sweeper: the cache holds the only copy of every mapping.
            tracing::warn!("Memory storage: mappings are lost on restart");

            Ok(StorageRuntime {
                storage: cache,
                sweeper: None,
            })
        }
        StorageMode::Tiered => {
            let pool = connect_pool(config).await?;
            let durable = Arc::new(PgUrlRepository::new(
                Arc::new(pool),
                config.db_query_timeout(),
            ));

            let sweeper = spawn_sweeper(
                cache.clone(),
                config.cache_sweep_interval(),
                config.cache_ttl(),
                shutdown.clone(),
            );
            tracing::info!("Tiered storage enabled (cache + PostgreSQL)");

            Ok(StorageRuntime {
                storage: Arc::new(TieredStorage::new(cache, durable)),
                sweeper: Some(sweeper),
            })
        }
    }
}

/// Waits for Ctrl+C or SIGTERM, then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        _ = terminate => tracing::info!("Received SIGTERM, initiating shutdown..."),
        _ = shutdown.cancelled() => {}
    }

    shutdown.cancel();
}
