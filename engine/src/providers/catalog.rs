//! Catalog repository trait.
//!
//! Read-only lookups against the system-of-record for item, event and
//! claimant configuration. The catalog is the sole source of truth for
//! supply numbers and windows; the ledger and cache are derived from it.

use flashdrop_core::error::Result;
use flashdrop_core::{Claimant, ClaimantId, Event, EventId, Item, ItemId};

/// Query-only system-of-record reads.
pub trait CatalogRepository: Send + Sync {
    /// Fetch an item together with its owning event.
    ///
    /// # Errors
    ///
    /// [`IssueError::ItemNotFound`] if the item is absent,
    /// [`IssueError::StoreUnavailable`] on query failure.
    ///
    /// [`IssueError::ItemNotFound`]: flashdrop_core::IssueError::ItemNotFound
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn item_with_event(&self, item_id: ItemId)
        -> impl Future<Output = Result<(Item, Event)>> + Send;

    /// Fetch a single event.
    ///
    /// # Errors
    ///
    /// [`IssueError::EventNotFound`] if absent.
    ///
    /// [`IssueError::EventNotFound`]: flashdrop_core::IssueError::EventNotFound
    fn event(&self, event_id: EventId) -> impl Future<Output = Result<Event>> + Send;

    /// List all events.
    ///
    /// # Errors
    ///
    /// [`IssueError::StoreUnavailable`] on query failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn events(&self) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// List the items belonging to an event.
    ///
    /// # Errors
    ///
    /// [`IssueError::StoreUnavailable`] on query failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn items_for_event(&self, event_id: EventId) -> impl Future<Output = Result<Vec<Item>>> + Send;

    /// Look up a claimant by identity.
    ///
    /// # Errors
    ///
    /// [`IssueError::ClaimantNotFound`] if absent.
    ///
    /// [`IssueError::ClaimantNotFound`]: flashdrop_core::IssueError::ClaimantNotFound
    fn claimant(&self, claimant_id: ClaimantId) -> impl Future<Output = Result<Claimant>> + Send;
}
