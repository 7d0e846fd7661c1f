//! In-memory detail cache for testing.

use crate::providers::DetailCache;
use flashdrop_core::error::Result;
use flashdrop_core::{IssueError, ItemId, ItemSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// In-memory [`DetailCache`] storing the same JSON the store would.
///
/// Serializing through JSON (rather than keeping the struct) keeps the
/// corrupt-payload path testable with [`put_raw`](Self::put_raw).
#[derive(Debug, Clone, Default)]
pub struct MockDetailCache {
    entries: Arc<Mutex<HashMap<ItemId, (String, Instant)>>>,
}

impl MockDetailCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant a raw payload, bypassing serialization (corruption tests).
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn put_raw(&self, item_id: ItemId, raw: impl Into<String>, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(item_id, (raw.into(), Instant::now() + ttl));
    }

    /// Number of live (unexpired) entries.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.lock().unwrap().values().filter(|(_, exp)| *exp > now).count()
    }

    /// True when no live entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DetailCache for MockDetailCache {
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSnapshot>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        let Some((raw, expires_at)) = entries.get(&item_id) else {
            return Ok(None);
        };
        if *expires_at <= Instant::now() {
            return Ok(None);
        }

        match serde_json::from_str(raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                tracing::warn!(
                    item_id = %item_id,
                    error = %e,
                    "Mock cache payload failed to deserialize; treating as miss"
                );
                Ok(None)
            }
        }
    }

    async fn put(&self, item_id: ItemId, snapshot: &ItemSnapshot, ttl: Duration) -> Result<()> {
        let json = serde_json::to_string(snapshot)
            .map_err(|e| IssueError::StoreUnavailable(format!("serialize failed: {e}")))?;

        self.entries
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?
            .insert(item_id, (json, Instant::now() + ttl));
        Ok(())
    }
}
