//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache selection, the visit worker and the
//! Axum server lifecycle.

use crate::config::Config;
use crate::domain::visit_worker::run_visit_worker;
use crate::infrastructure::cache::{
    CacheService, MemoryCache, NullCache, PopularityCounter, RedisCache,
};
use crate::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long shutdown waits for queued visit events to be written.
const VISIT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Cache and popularity counter (Redis, in-process, or disabled)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, the
/// listen address cannot be bound, or the server fails at runtime.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let (cache, counter) = build_cache(&config).await;

    let pool = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
    let token_repository = Arc::new(PgTokenRepository::new(pool));

    let (visit_sender, visit_worker) = if config.track_visits {
        let (tx, rx) = mpsc::channel(config.visit_queue_capacity);
        let handle = tokio::spawn(run_visit_worker(rx, link_repository.clone()));
        (Some(tx), Some(handle))
    } else {
        tracing::info!("Visit tracking disabled");
        (None, None)
    };

    let state = AppState::new(
        link_repository,
        token_repository,
        cache,
        counter,
        config.promotion_policy(),
        config.token_signing_secret.clone(),
        visit_sender,
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last senders; the worker exits once the queue drains.
    if let Some(handle) = visit_worker
        && tokio::time::timeout(VISIT_DRAIN_TIMEOUT, handle).await.is_err()
    {
        tracing::warn!("Visit worker did not drain in time, pending visits dropped");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Picks the cache and counter backend.
///
/// - Redis configured and reachable: shared Redis
/// - Redis configured but unreachable: [`NullCache`], so instances never
///   serve per-process entries another instance already invalidated
/// - Redis not configured: [`MemoryCache`] for a single instance
async fn build_cache(config: &Config) -> (Arc<dyn CacheService>, Arc<dyn PopularityCounter>) {
    match &config.redis_url {
        Some(redis_url) => match RedisCache::connect(redis_url, config.popularity_ttl()).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                let redis = Arc::new(redis);
                (redis.clone(), redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Caching disabled.", e);
                let null = Arc::new(NullCache::new());
                (null.clone(), null)
            }
        },
        None => {
            tracing::info!("Cache enabled (in-process)");
            let memory = Arc::new(MemoryCache::with_counter_ttl(config.popularity_ttl()));
            (memory.clone(), memory)
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
