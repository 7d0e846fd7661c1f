//! Redis-based atomic stock ledger.
//!
//! The claim path executes one Lua script so that the duplicate check, the
//! decrement and the claimed-set insertion are a single indivisible
//! operation — no concurrent claim for the same item ever observes an
//! intermediate state.
//!
//! # Script contract
//!
//! `KEYS[1]`: claimed-set key, `KEYS[2]`: stock key, `ARGV[1]`: claimant id.
//! Returns `1` granted, `0` exhausted, `-1` already claimed.
//!
//! The membership check runs strictly before the decrement so a duplicate
//! claimant never consumes stock; a decrement that goes negative is undone
//! inside the same script.

use crate::keys;
use crate::providers::StockLedger;
use flashdrop_core::error::Result;
use flashdrop_core::{ClaimOutcome, ClaimantId, IssueError, ItemId};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

/// Atomic check-and-claim script. Duplicate check first, then decrement,
/// undoing the decrement when stock runs out.
const CLAIM_SCRIPT: &str = r"
if redis.call('SISMEMBER', KEYS[1], ARGV[1]) == 1 then
  return -1
end
local remaining = redis.call('DECR', KEYS[2])
if remaining < 0 then
  redis.call('INCR', KEYS[2])
  return 0
end
redis.call('SADD', KEYS[1], ARGV[1])
return 1
";

/// Redis-backed [`StockLedger`].
///
/// # Example
///
/// ```no_run
/// use flashdrop_engine::stores::RedisStockLedger;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let ledger = RedisStockLedger::new("redis://127.0.0.1:6379").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisStockLedger {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
    /// Pre-parsed claim script (hashed once, EVALSHA afterwards).
    claim_script: Script,
}

impl RedisStockLedger {
    /// Create a ledger with its own connection manager.
    ///
    /// # Errors
    ///
    /// Returns error if connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let conn_manager = super::connect(redis_url).await?;
        Ok(Self::from_manager(conn_manager))
    }

    /// Create a ledger over a shared connection manager.
    #[must_use]
    pub fn from_manager(conn_manager: ConnectionManager) -> Self {
        Self {
            conn_manager,
            claim_script: Script::new(CLAIM_SCRIPT),
        }
    }
}

impl StockLedger for RedisStockLedger {
    async fn try_claim(&self, item_id: ItemId, claimant_id: ClaimantId) -> Result<ClaimOutcome> {
        let mut conn = self.conn_manager.clone();

        let verdict: i64 = self
            .claim_script
            .key(keys::claimants(item_id))
            .key(keys::stock(item_id))
            .arg(claimant_id.0)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    item_id = %item_id,
                    claimant_id = %claimant_id,
                    "Claim script failed; outcome is indeterminate"
                );
                IssueError::StoreUnavailable(format!(
                    "Claim script failed for item {item_id}: {e}"
                ))
            })?;

        let outcome = match verdict {
            1 => ClaimOutcome::Granted,
            0 => ClaimOutcome::Exhausted,
            -1 => ClaimOutcome::AlreadyClaimed,
            other => {
                return Err(IssueError::StoreUnavailable(format!(
                    "Claim script returned unexpected verdict {other} for item {item_id}"
                )));
            }
        };

        tracing::debug!(
            item_id = %item_id,
            claimant_id = %claimant_id,
            outcome = ?outcome,
            "Ledger claim attempt"
        );

        Ok(outcome)
    }

    async fn init_if_absent(&self, item_id: ItemId, total_supply: i32) -> Result<bool> {
        let mut conn = self.conn_manager.clone();

        // SETNX: a live (possibly already-decremented) counter is never
        // overwritten; only an absent or evicted key is seeded.
        let created: bool = conn
            .set_nx(keys::stock(item_id), total_supply)
            .await
            .map_err(|e| {
                IssueError::StoreUnavailable(format!(
                    "Failed to initialize stock for item {item_id}: {e}"
                ))
            })?;

        if created {
            tracing::info!(
                item_id = %item_id,
                total_supply = total_supply,
                "Initialized ledger stock"
            );
        }

        Ok(created)
    }

    async fn rollback(&self, item_id: ItemId, claimant_id: ClaimantId) -> Result<()> {
        let mut conn = self.conn_manager.clone();

        // Both halves of the reversal move together or not at all.
        let _: () = redis::pipe()
            .atomic()
            .incr(keys::stock(item_id), 1)
            .ignore()
            .srem(keys::claimants(item_id), claimant_id.0)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                IssueError::StoreUnavailable(format!(
                    "Failed to roll back grant for item {item_id}: {e}"
                ))
            })?;

        tracing::warn!(
            item_id = %item_id,
            claimant_id = %claimant_id,
            "Rolled back ledger grant"
        );

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Note: These tests require a running Redis instance
    // Run with: docker run -d -p 6379:6379 redis:7-alpine

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    /// Unique item id per test run so parallel runs don't collide.
    fn fresh_item() -> ItemId {
        ItemId(i64::from(uuid::Uuid::new_v4().as_fields().0))
    }

    async fn remaining(ledger: &RedisStockLedger, item_id: ItemId) -> i64 {
        let mut conn = ledger.conn_manager.clone();
        conn.get::<_, i64>(keys::stock(item_id)).await.unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn grant_then_duplicate_then_exhaust() {
        let ledger = RedisStockLedger::new(REDIS_URL).await.unwrap();
        let item = fresh_item();

        assert!(ledger.init_if_absent(item, 1).await.unwrap());

        let first = ledger.try_claim(item, ClaimantId(1)).await.unwrap();
        assert_eq!(first, ClaimOutcome::Granted);

        // Same claimant again: refused before any stock movement.
        let dup = ledger.try_claim(item, ClaimantId(1)).await.unwrap();
        assert_eq!(dup, ClaimOutcome::AlreadyClaimed);
        assert_eq!(remaining(&ledger, item).await, 0);

        // Different claimant: supply is gone.
        let second = ledger.try_claim(item, ClaimantId(2)).await.unwrap();
        assert_eq!(second, ClaimOutcome::Exhausted);
        assert_eq!(remaining(&ledger, item).await, 0);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn init_is_a_noop_once_consumed() {
        let ledger = RedisStockLedger::new(REDIS_URL).await.unwrap();
        let item = fresh_item();

        assert!(ledger.init_if_absent(item, 3).await.unwrap());
        ledger.try_claim(item, ClaimantId(7)).await.unwrap();
        assert_eq!(remaining(&ledger, item).await, 2);

        // Re-activation must not resurrect the consumed unit.
        assert!(!ledger.init_if_absent(item, 3).await.unwrap());
        assert_eq!(remaining(&ledger, item).await, 2);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn rollback_is_inverse_of_grant() {
        let ledger = RedisStockLedger::new(REDIS_URL).await.unwrap();
        let item = fresh_item();
        let claimant = ClaimantId(11);

        ledger.init_if_absent(item, 2).await.unwrap();
        assert_eq!(ledger.try_claim(item, claimant).await.unwrap(), ClaimOutcome::Granted);
        assert_eq!(remaining(&ledger, item).await, 1);

        ledger.rollback(item, claimant).await.unwrap();
        assert_eq!(remaining(&ledger, item).await, 2);

        // The claimant can claim again after the reversal.
        assert_eq!(ledger.try_claim(item, claimant).await.unwrap(), ClaimOutcome::Granted);
    }

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn concurrent_claimants_never_oversell() {
        let ledger = RedisStockLedger::new(REDIS_URL).await.unwrap();
        let item = fresh_item();
        let supply = 5;
        let attempts = 20;

        ledger.init_if_absent(item, supply).await.unwrap();

        let mut handles = Vec::new();
        for claimant in 0..attempts {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.try_claim(item, ClaimantId(claimant)).await
            }));
        }

        let mut granted = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.await.unwrap().unwrap() {
                ClaimOutcome::Granted => granted += 1,
                ClaimOutcome::Exhausted => exhausted += 1,
                ClaimOutcome::AlreadyClaimed => panic!("distinct claimants cannot duplicate"),
            }
        }

        assert_eq!(granted, i64::from(supply));
        assert_eq!(exhausted, attempts - i64::from(supply));
        assert_eq!(remaining(&ledger, item).await, 0);
    }
}
