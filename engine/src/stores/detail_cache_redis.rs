//! Redis-based detail cache.
//!
//! Stores one JSON-serialized [`ItemSnapshot`] per item under
//! `item:detail:{id}` with a TTL. A payload that no longer deserializes
//! (schema drift, manual edits) is logged and reported as a miss so the
//! caller falls through to the system-of-record — corruption must never
//! block issuance.

use crate::keys;
use crate::providers::DetailCache;
use flashdrop_core::error::Result;
use flashdrop_core::{IssueError, ItemId, ItemSnapshot};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Redis-backed [`DetailCache`].
#[derive(Clone)]
pub struct RedisDetailCache {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
}

impl RedisDetailCache {
    /// Create a cache with its own connection manager.
    ///
    /// # Errors
    ///
    /// Returns error if connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let conn_manager = super::connect(redis_url).await?;
        Ok(Self::from_manager(conn_manager))
    }

    /// Create a cache over a shared connection manager.
    #[must_use]
    pub const fn from_manager(conn_manager: ConnectionManager) -> Self {
        Self { conn_manager }
    }
}

impl DetailCache for RedisDetailCache {
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSnapshot>> {
        let mut conn = self.conn_manager.clone();
        let key = keys::item_detail(item_id);

        let raw: Option<String> = conn.get(&key).await.map_err(|e| {
            IssueError::StoreUnavailable(format!("Failed to read detail cache {key}: {e}"))
        })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<ItemSnapshot>(&raw) {
            Ok(snapshot) => {
                tracing::debug!(item_id = %item_id, "Detail cache hit");
                Ok(Some(snapshot))
            }
            Err(e) => {
                // Corrupt entry: treat as a miss, let the TTL or the next
                // put replace it.
                tracing::warn!(
                    item_id = %item_id,
                    error = %e,
                    "Detail cache payload failed to deserialize; treating as miss"
                );
                Ok(None)
            }
        }
    }

    async fn put(&self, item_id: ItemId, snapshot: &ItemSnapshot, ttl: Duration) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let key = keys::item_detail(item_id);

        let json = serde_json::to_string(snapshot).map_err(|e| {
            IssueError::StoreUnavailable(format!("Failed to serialize snapshot for {key}: {e}"))
        })?;

        let _: () = conn.set_ex(&key, json, ttl.as_secs().max(1)).await.map_err(|e| {
            IssueError::StoreUnavailable(format!("Failed to write detail cache {key}: {e}"))
        })?;

        tracing::debug!(item_id = %item_id, ttl_seconds = ttl.as_secs(), "Detail cache write");
        Ok(())
    }
}
