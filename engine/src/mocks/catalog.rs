//! In-memory catalog repository for testing.

use crate::providers::CatalogRepository;
use flashdrop_core::error::Result;
use flashdrop_core::{Claimant, ClaimantId, Event, EventId, IssueError, Item, ItemId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Inner {
    events: HashMap<EventId, Event>,
    items: HashMap<ItemId, Item>,
    claimants: HashMap<ClaimantId, Claimant>,
}

/// In-memory [`CatalogRepository`].
///
/// Counts item lookups so tests can assert the cache kept the
/// system-of-record off the hot path.
#[derive(Debug, Clone, Default)]
pub struct MockCatalog {
    inner: Arc<Mutex<Inner>>,
    item_lookups: Arc<AtomicUsize>,
}

impl MockCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert_event(&self, event: Event) {
        self.inner.lock().unwrap().events.insert(event.event_id, event);
    }

    /// Register an item.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert_item(&self, item: Item) {
        self.inner.lock().unwrap().items.insert(item.item_id, item);
    }

    /// Register a claimant.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert_claimant(&self, claimant: Claimant) {
        self.inner.lock().unwrap().claimants.insert(claimant.claimant_id, claimant);
    }

    /// How many times `item_with_event` hit this repository.
    #[must_use]
    pub fn item_lookups(&self) -> usize {
        self.item_lookups.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))
    }
}

impl CatalogRepository for MockCatalog {
    async fn item_with_event(&self, item_id: ItemId) -> Result<(Item, Event)> {
        self.item_lookups.fetch_add(1, Ordering::SeqCst);
        let inner = self.lock()?;
        let item = inner.items.get(&item_id).cloned().ok_or(IssueError::ItemNotFound(item_id))?;
        let event = inner
            .events
            .get(&item.event_id)
            .cloned()
            .ok_or(IssueError::EventNotFound(item.event_id))?;
        Ok((item, event))
    }

    async fn event(&self, event_id: EventId) -> Result<Event> {
        self.lock()?
            .events
            .get(&event_id)
            .cloned()
            .ok_or(IssueError::EventNotFound(event_id))
    }

    async fn events(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.lock()?.events.values().cloned().collect();
        events.sort_by_key(|e| e.event_id);
        Ok(events)
    }

    async fn items_for_event(&self, event_id: EventId) -> Result<Vec<Item>> {
        let mut items: Vec<Item> = self
            .lock()?
            .items
            .values()
            .filter(|i| i.event_id == event_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.item_id);
        Ok(items)
    }

    async fn claimant(&self, claimant_id: ClaimantId) -> Result<Claimant> {
        self.lock()?
            .claimants
            .get(&claimant_id)
            .cloned()
            .ok_or(IssueError::ClaimantNotFound(claimant_id))
    }
}
