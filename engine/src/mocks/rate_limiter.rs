//! In-memory rate limiter for testing.

use crate::keys;
use crate::providers::RateLimiter;
use flashdrop_core::error::Result;
use flashdrop_core::{ClaimantId, IssueError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// One fixed window: the running count and when the window lapses.
#[derive(Debug, Clone, Copy)]
struct Window {
    count: u64,
    expires_at: Instant,
}

/// In-memory [`RateLimiter`] with fixed-window counters.
///
/// Mirrors the store semantics: the expiry is armed on a counter's first
/// increment, denial keeps the increment, and the claimant counter is
/// checked before the origin counter is touched.
#[derive(Debug, Clone, Default)]
pub struct MockRateLimiter {
    counters: Arc<Mutex<HashMap<String, Window>>>,
}

impl MockRateLimiter {
    /// Create an empty limiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current count for a raw counter key (see [`crate::keys`]).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn attempts(&self, key: &str) -> u64 {
        let now = Instant::now();
        self.counters
            .lock()
            .unwrap()
            .get(key)
            .filter(|w| w.expires_at > now)
            .map_or(0, |w| w.count)
    }

    fn incr(&self, key: String, window: Duration) -> Result<u64> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        let now = Instant::now();
        let entry = counters
            .entry(key)
            .and_modify(|w| {
                if w.expires_at <= now {
                    // Window lapsed: reset and re-arm, as expiry would.
                    w.count = 0;
                    w.expires_at = now + window;
                }
            })
            .or_insert(Window { count: 0, expires_at: now + window });

        entry.count += 1;
        Ok(entry.count)
    }
}

impl RateLimiter for MockRateLimiter {
    async fn admit(
        &self,
        claimant_id: ClaimantId,
        origin: Option<&str>,
        max_requests: u32,
        window: Duration,
    ) -> Result<bool> {
        let max = u64::from(max_requests);

        let claimant_count = self.incr(keys::rate_claimant(claimant_id), window)?;
        if claimant_count > max {
            return Ok(false);
        }

        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            let origin_count = self.incr(keys::rate_origin(origin), window)?;
            if origin_count > max {
                return Ok(false);
            }
        }

        Ok(true)
    }
}
