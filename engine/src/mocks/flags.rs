//! In-memory activation flags for testing.

use crate::keys;
use crate::providers::ActivationFlags;
use flashdrop_core::error::Result;
use flashdrop_core::{EventId, IssueError, ItemId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// In-memory [`ActivationFlags`] with real expiry.
#[derive(Debug, Clone, Default)]
pub struct MockActivationFlags {
    flags: Arc<Mutex<HashMap<String, Instant>>>,
}

impl MockActivationFlags {
    /// Create an empty flag store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a flag immediately, simulating TTL lapse.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn expire_event(&self, event_id: EventId) {
        self.flags.lock().unwrap().remove(&keys::event_active(event_id));
    }

    fn set(&self, key: String, ttl: Duration) -> Result<()> {
        self.flags
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?
            .insert(key, Instant::now() + ttl);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .flags
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?
            .get(key)
            .is_some_and(|expires_at| *expires_at > now))
    }
}

impl ActivationFlags for MockActivationFlags {
    async fn set_event_active(&self, event_id: EventId, ttl: Duration) -> Result<()> {
        self.set(keys::event_active(event_id), ttl)
    }

    async fn set_item_active(&self, item_id: ItemId, ttl: Duration) -> Result<()> {
        self.set(keys::item_active(item_id), ttl)
    }

    async fn is_event_active(&self, event_id: EventId) -> Result<bool> {
        self.exists(&keys::event_active(event_id))
    }

    async fn is_item_active(&self, item_id: ItemId) -> Result<bool> {
        self.exists(&keys::item_active(item_id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn absent_until_set_then_expires() {
        let flags = MockActivationFlags::new();
        let event = EventId(3);

        assert!(!flags.is_event_active(event).await.unwrap());

        flags.set_event_active(event, Duration::from_secs(60)).await.unwrap();
        assert!(flags.is_event_active(event).await.unwrap());

        flags.expire_event(event);
        assert!(!flags.is_event_active(event).await.unwrap());
    }
}
