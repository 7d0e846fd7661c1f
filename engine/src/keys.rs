//! Store key layout.
//!
//! Every key the engine touches is built here. The layout is part of the
//! engine's external contract (load tools and operational tooling read
//! these keys directly), so changing a prefix is a breaking change.

use flashdrop_core::{ClaimantId, EventId, ItemId};

/// Remaining-stock counter for an item (integer string).
#[must_use]
pub fn stock(item_id: ItemId) -> String {
    format!("item:{item_id}:stock")
}

/// Set of claimant ids already granted an item.
#[must_use]
pub fn claimants(item_id: ItemId) -> String {
    format!("item:{item_id}:claimants")
}

/// TTL flag marking an event as claimable.
#[must_use]
pub fn event_active(event_id: EventId) -> String {
    format!("event:{event_id}:active")
}

/// TTL flag marking an item as claimable.
#[must_use]
pub fn item_active(item_id: ItemId) -> String {
    format!("item:{item_id}:active")
}

/// Fixed-window attempt counter for a claimant.
#[must_use]
pub fn rate_claimant(claimant_id: ClaimantId) -> String {
    format!("rate:claimant:{claimant_id}")
}

/// Fixed-window attempt counter for a network origin.
#[must_use]
pub fn rate_origin(origin: &str) -> String {
    format!("rate:origin:{origin}")
}

/// JSON snapshot of item + event display fields.
#[must_use]
pub fn item_detail(item_id: ItemId) -> String {
    format!("item:detail:{item_id}")
}
