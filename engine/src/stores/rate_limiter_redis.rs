//! Redis-based fixed-window rate limiter.
//!
//! # Algorithm
//!
//! The canonical fixed-window counter: one script per key does
//! `INCR`, and — only when the resulting value is `1`, i.e. the window
//! just opened — `EXPIRE key window`. The counter resets exclusively
//! through expiry.
//!
//! Two keys are advanced per attempt: `rate:claimant:{id}` always, and
//! `rate:origin:{id}` when the caller knows the network origin. A request
//! is admitted only when both post-increment counts are at or below the
//! maximum. Denied attempts stay counted — the limit is on attempts, not
//! on successes.

use crate::keys;
use crate::providers::RateLimiter;
use flashdrop_core::error::Result;
use flashdrop_core::{ClaimantId, IssueError};
use redis::Script;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Increment a window counter, arming the expiry on the first hit.
/// `KEYS[1]`: counter key, `ARGV[1]`: window length in seconds.
const RATE_INCR_SCRIPT: &str = r"
local v = redis.call('INCR', KEYS[1])
if v == 1 then
  redis.call('EXPIRE', KEYS[1], ARGV[1])
end
return v
";

/// Redis-backed [`RateLimiter`] using fixed-window counters.
///
/// # Example
///
/// ```no_run
/// use flashdrop_engine::stores::RedisRateLimiter;
/// use flashdrop_engine::providers::RateLimiter;
/// use flashdrop_core::ClaimantId;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let limiter = RedisRateLimiter::new("redis://127.0.0.1:6379").await?;
/// let admitted = limiter
///     .admit(ClaimantId(42), Some("203.0.113.9"), 10, Duration::from_secs(60))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisRateLimiter {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
    /// Pre-parsed increment-with-expiry script.
    incr_script: Script,
}

impl RedisRateLimiter {
    /// Create a rate limiter with its own connection manager.
    ///
    /// # Errors
    ///
    /// Returns error if connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let conn_manager = super::connect(redis_url).await?;
        Ok(Self::from_manager(conn_manager))
    }

    /// Create a rate limiter over a shared connection manager.
    #[must_use]
    pub fn from_manager(conn_manager: ConnectionManager) -> Self {
        Self {
            conn_manager,
            incr_script: Script::new(RATE_INCR_SCRIPT),
        }
    }

    /// Advance one window counter and return its post-increment value.
    async fn incr_with_ttl(
        &self,
        conn: &mut ConnectionManager,
        key: &str,
        window: Duration,
    ) -> Result<u64> {
        self.incr_script
            .key(key)
            .arg(window.as_secs().max(1))
            .invoke_async(conn)
            .await
            .map_err(|e| {
                IssueError::StoreUnavailable(format!("Rate counter update failed for {key}: {e}"))
            })
    }
}

impl RateLimiter for RedisRateLimiter {
    async fn admit(
        &self,
        claimant_id: ClaimantId,
        origin: Option<&str>,
        max_requests: u32,
        window: Duration,
    ) -> Result<bool> {
        let mut conn = self.conn_manager.clone();
        let max = u64::from(max_requests);

        let claimant_count = self
            .incr_with_ttl(&mut conn, &keys::rate_claimant(claimant_id), window)
            .await?;
        if claimant_count > max {
            tracing::warn!(
                rate_limit_exceeded = true,
                claimant_id = %claimant_id,
                attempts = claimant_count,
                max_requests = max_requests,
                "Claimant rate limit exceeded"
            );
            return Ok(false);
        }

        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            let origin_count = self
                .incr_with_ttl(&mut conn, &keys::rate_origin(origin), window)
                .await?;
            if origin_count > max {
                tracing::warn!(
                    rate_limit_exceeded = true,
                    origin = %origin,
                    attempts = origin_count,
                    max_requests = max_requests,
                    "Origin rate limit exceeded"
                );
                return Ok(false);
            }
        }

        tracing::debug!(
            claimant_id = %claimant_id,
            attempts = claimant_count,
            max_requests = max_requests,
            "Rate limit check passed"
        );

        Ok(true)
    }
}
