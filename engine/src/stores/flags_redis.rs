//! Redis-based activation flags.
//!
//! Activation plants `event:{id}:active` and `item:{id}:active` as plain
//! string keys with a TTL bound to the event's end. Deactivation is never
//! explicit — the flags simply expire with the event window.

use crate::keys;
use crate::providers::ActivationFlags;
use flashdrop_core::error::Result;
use flashdrop_core::{EventId, IssueError, ItemId};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;

/// Redis-backed [`ActivationFlags`].
#[derive(Clone)]
pub struct RedisActivationFlags {
    /// Connection manager for connection pooling.
    conn_manager: ConnectionManager,
}

impl RedisActivationFlags {
    /// Create a flag store with its own connection manager.
    ///
    /// # Errors
    ///
    /// Returns error if connection to Redis fails.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let conn_manager = super::connect(redis_url).await?;
        Ok(Self::from_manager(conn_manager))
    }

    /// Create a flag store over a shared connection manager.
    #[must_use]
    pub const fn from_manager(conn_manager: ConnectionManager) -> Self {
        Self { conn_manager }
    }

    async fn set_flag(&self, key: String, ttl: Duration) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: () = conn
            .set_ex(&key, "true", ttl.as_secs().max(1))
            .await
            .map_err(|e| {
                IssueError::StoreUnavailable(format!("Failed to set active flag {key}: {e}"))
            })?;

        tracing::info!(key = %key, ttl_seconds = ttl.as_secs(), "Set activation flag");
        Ok(())
    }

    async fn flag_exists(&self, key: String) -> Result<bool> {
        let mut conn = self.conn_manager.clone();
        conn.exists(&key).await.map_err(|e| {
            IssueError::StoreUnavailable(format!("Failed to read active flag {key}: {e}"))
        })
    }
}

impl ActivationFlags for RedisActivationFlags {
    async fn set_event_active(&self, event_id: EventId, ttl: Duration) -> Result<()> {
        self.set_flag(keys::event_active(event_id), ttl).await
    }

    async fn set_item_active(&self, item_id: ItemId, ttl: Duration) -> Result<()> {
        self.set_flag(keys::item_active(item_id), ttl).await
    }

    async fn is_event_active(&self, event_id: EventId) -> Result<bool> {
        self.flag_exists(keys::event_active(event_id)).await
    }

    async fn is_item_active(&self, item_id: ItemId) -> Result<bool> {
        self.flag_exists(keys::item_active(item_id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // Note: These tests require a running Redis instance
    // Run with: docker run -d -p 6379:6379 redis:7-alpine

    const REDIS_URL: &str = "redis://127.0.0.1:6379";

    #[tokio::test]
    #[ignore] // Requires Redis running
    async fn flag_set_and_expiry() {
        let flags = RedisActivationFlags::new(REDIS_URL).await.unwrap();
        let event = EventId(i64::from(uuid::Uuid::new_v4().as_fields().0));

        assert!(!flags.is_event_active(event).await.unwrap());

        flags.set_event_active(event, Duration::from_secs(1)).await.unwrap();
        assert!(flags.is_event_active(event).await.unwrap());

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!flags.is_event_active(event).await.unwrap(), "flag should expire on its own");
    }
}
