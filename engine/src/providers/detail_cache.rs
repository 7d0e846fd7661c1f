//! Detail cache trait.
//!
//! Read-through cache of item + event display metadata, keeping the
//! system-of-record off the hot claim path. Cached snapshots are never
//! authoritative for stock or window gating.

use flashdrop_core::error::Result;
use flashdrop_core::{ItemId, ItemSnapshot};
use std::time::Duration;

/// TTL cache of serialized [`ItemSnapshot`]s.
pub trait DetailCache: Send + Sync {
    /// Fetch the cached snapshot, if any.
    ///
    /// A stored value that fails to deserialize is reported as a miss
    /// (`Ok(None)`), never as an error — staleness or corruption must not
    /// block issuance.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn get(&self, item_id: ItemId) -> impl Future<Output = Result<Option<ItemSnapshot>>> + Send;

    /// Store a snapshot with the given TTL, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn put(
        &self,
        item_id: ItemId,
        snapshot: &ItemSnapshot,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send;
}
