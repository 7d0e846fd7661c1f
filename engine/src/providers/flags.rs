//! Activation flag trait.
//!
//! Events and items are made claimable by an administrative activation
//! step that plants TTL flags in the store; the flags disappear on their
//! own when the event window closes. An absent event flag refuses claims.

use flashdrop_core::error::Result;
use flashdrop_core::{EventId, ItemId};
use std::time::Duration;

/// TTL-backed "claimable" flags for events and items.
pub trait ActivationFlags: Send + Sync {
    /// Mark an event claimable for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn set_event_active(
        &self,
        event_id: EventId,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Mark an item claimable for `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn set_item_active(
        &self,
        item_id: ItemId,
        ttl: Duration,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Is the event's flag present (and unexpired)?
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn is_event_active(&self, event_id: EventId) -> impl Future<Output = Result<bool>> + Send;

    /// Is the item's flag present (and unexpired)?
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn is_item_active(&self, item_id: ItemId) -> impl Future<Output = Result<bool>> + Send;
}
