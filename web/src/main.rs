//! flashdrop HTTP server.
//!
//! Wires the Redis fast path and the PostgreSQL system-of-record into the
//! issuance engine and serves the claim API.

use flashdrop_engine::stores::{
    self, RedisActivationFlags, RedisDetailCache, RedisRateLimiter, RedisStockLedger,
};
use flashdrop_engine::{ActivationService, Issuer};
use flashdrop_postgres::{PostgresCatalog, PostgresClaimRepository, connect_pool, migrate};
use flashdrop_web::{AppState, Config, build_router, metrics};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flashdrop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting flashdrop server");

    let config = Config::from_env();
    info!(
        redis_url = %config.redis.url,
        postgres_url = %config.postgres.url,
        rate_limit_max = config.engine.rate_limit.max_requests,
        "Configuration loaded"
    );

    metrics::register_business_metrics();

    // One Redis connection manager shared by all four stores.
    let conn_manager = stores::connect(&config.redis.url).await?;
    let ledger = RedisStockLedger::from_manager(conn_manager.clone());
    let limiter = RedisRateLimiter::from_manager(conn_manager.clone());
    let flags = RedisActivationFlags::from_manager(conn_manager.clone());
    let cache = RedisDetailCache::from_manager(conn_manager);
    info!("Redis stores ready");

    // System-of-record pool plus schema.
    let pool = connect_pool(&config.postgres.url, config.postgres.max_connections).await?;
    migrate(&pool).await?;
    let catalog = PostgresCatalog::new(pool.clone());
    let claims = PostgresClaimRepository::new(pool);
    info!("System-of-record ready");

    let issuer = Issuer::new(
        catalog.clone(),
        claims.clone(),
        ledger.clone(),
        limiter,
        flags.clone(),
        cache,
        config.engine,
    );
    let activation = ActivationService::new(catalog.clone(), ledger, flags.clone());

    let state = AppState { issuer, activation, catalog, claims, flags };
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown handler");
    }
}
