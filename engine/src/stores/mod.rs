//! Redis-backed store implementations.
//!
//! One store per provider trait, all sharing the `item:*`, `event:*` and
//! `rate:*` key layout from [`crate::keys`]:
//!
//! - **Stock Ledger** — atomic claim script over counter + claimed-set
//! - **Rate Limiter** — fixed-window counters with first-hit expiry
//! - **Activation Flags** — TTL flags planted by the activation step
//! - **Detail Cache** — JSON snapshots with TTL

pub mod detail_cache_redis;
pub mod flags_redis;
pub mod ledger_redis;
pub mod rate_limiter_redis;

// Re-exports
pub use detail_cache_redis::RedisDetailCache;
pub use flags_redis::RedisActivationFlags;
pub use ledger_redis::RedisStockLedger;
pub use rate_limiter_redis::RedisRateLimiter;

use flashdrop_core::{IssueError, error::Result};
use redis::Client;
use redis::aio::ConnectionManager;

/// Open a shared connection manager for the given Redis URL.
///
/// All four stores can be built from one manager; cloning a
/// [`ConnectionManager`] is cheap and multiplexes onto the same
/// connection.
///
/// # Errors
///
/// Returns [`IssueError::StoreUnavailable`] if the client cannot be
/// created or the connection cannot be established.
pub async fn connect(redis_url: &str) -> Result<ConnectionManager> {
    let client = Client::open(redis_url)
        .map_err(|e| IssueError::StoreUnavailable(format!("Failed to create Redis client: {e}")))?;

    ConnectionManager::new(client).await.map_err(|e| {
        IssueError::StoreUnavailable(format!("Failed to create Redis connection manager: {e}"))
    })
}
