//! Event activation.
//!
//! The administrative step that opens an event for claiming: every item's
//! ledger entry is seeded from its configured supply (initialize-if-absent,
//! so re-running an activation never resurrects consumed stock) and the
//! event/item active flags are planted with a TTL that lapses at the
//! event's end.

use crate::providers::{ActivationFlags, CatalogRepository, StockLedger};
use chrono::{DateTime, Utc};
use flashdrop_core::error::Result;
use flashdrop_core::{EventId, IssueError};
use std::time::Duration;

/// Outcome of one activation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationSummary {
    /// Activated event.
    pub event_id: EventId,
    /// Items belonging to the event.
    pub items_total: usize,
    /// Items whose ledger entry was created by this run (the rest already
    /// had live counters).
    pub items_initialized: usize,
    /// When the planted flags lapse.
    pub active_until: DateTime<Utc>,
}

/// Administrative activation service.
#[derive(Clone)]
pub struct ActivationService<Cat, L, F>
where
    Cat: CatalogRepository + Clone,
    L: StockLedger + Clone,
    F: ActivationFlags + Clone,
{
    catalog: Cat,
    ledger: L,
    flags: F,
}

impl<Cat, L, F> ActivationService<Cat, L, F>
where
    Cat: CatalogRepository + Clone,
    L: StockLedger + Clone,
    F: ActivationFlags + Clone,
{
    /// Create an activation service over the given providers.
    #[must_use]
    pub const fn new(catalog: Cat, ledger: L, flags: F) -> Self {
        Self { catalog, ledger, flags }
    }

    /// Open `event_id` for claiming as of `now`.
    ///
    /// Idempotent: re-running seeds only ledger entries that are absent
    /// and refreshes the flags' TTL.
    ///
    /// # Errors
    ///
    /// [`IssueError::EventNotFound`] for an unknown event,
    /// [`IssueError::EventEnded`] when the window has already closed
    /// (there is nothing left to open), or
    /// [`IssueError::StoreUnavailable`] on store failure.
    pub async fn activate_event(
        &self,
        event_id: EventId,
        now: DateTime<Utc>,
    ) -> Result<ActivationSummary> {
        let event = self.catalog.event(event_id).await?;
        if now > event.ends_at {
            return Err(IssueError::EventEnded { event_id, ends_at: event.ends_at });
        }

        // Flags live exactly until the event window closes.
        let ttl = (event.ends_at - now)
            .to_std()
            .unwrap_or(Duration::from_secs(1))
            .max(Duration::from_secs(1));

        let items = self.catalog.items_for_event(event_id).await?;
        let mut items_initialized = 0;
        for item in &items {
            if self.ledger.init_if_absent(item.item_id, item.total_supply).await? {
                items_initialized += 1;
            }
            self.flags.set_item_active(item.item_id, ttl).await?;
        }
        self.flags.set_event_active(event_id, ttl).await?;

        tracing::info!(
            event_id = %event_id,
            items_total = items.len(),
            items_initialized = items_initialized,
            active_until = %event.ends_at,
            "Activated event"
        );

        Ok(ActivationSummary {
            event_id,
            items_total: items.len(),
            items_initialized,
            active_until: event.ends_at,
        })
    }
}
