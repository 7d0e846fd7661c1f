//! Domain types for coupon issuance.
//!
//! All types are `Clone` and serializable so they can cross the cache and
//! HTTP boundaries without bespoke DTOs. Identifiers are newtypes over the
//! system-of-record's 64-bit keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a claimable item ("coupon").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a time-boxed event owning items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a claimant ("user").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimantId(pub i64);

impl fmt::Display for ClaimantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a durable claim record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub i64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog Types
// ═══════════════════════════════════════════════════════════════════════

/// A time-boxed campaign owning zero or more items.
///
/// Invariant: `starts_at <= ends_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identity.
    pub event_id: EventId,
    /// Display name.
    pub name: String,
    /// Free-form display description.
    pub detail: Option<String>,
    /// Start of the claimable window.
    pub starts_at: DateTime<Utc>,
    /// End of the claimable window.
    pub ends_at: DateTime<Utc>,
}

/// A claimable unit with finite supply, owned by an [`Event`].
///
/// Invariants: `total_supply >= 0`, `apply_starts_at <= apply_ends_at`.
/// The application window is display metadata by default; whether it also
/// gates issuance is a configuration decision
/// ([`crate::config::EngineConfig::gate_on_item_window`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Item identity.
    pub item_id: ItemId,
    /// Owning event identity.
    pub event_id: EventId,
    /// Display name.
    pub name: String,
    /// Free-form display description.
    pub detail: Option<String>,
    /// Start of the item's application window.
    pub apply_starts_at: DateTime<Utc>,
    /// End of the item's application window.
    pub apply_ends_at: DateTime<Utc>,
    /// Total units ever grantable for this item.
    pub total_supply: i32,
}

/// The identity attempting to claim an item.
///
/// Credentials live entirely outside the engine; only the identity and its
/// login handle are carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claimant {
    /// Claimant identity.
    pub claimant_id: ClaimantId,
    /// Login handle (lookup only, never authentication).
    pub login_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// Claims
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a granted claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    /// Granted but not yet redeemed.
    Unused,
    /// Redeemed by the claimant.
    Used,
    /// Expired before redemption.
    Expired,
}

impl ClaimStatus {
    /// Stable string form used in the system-of-record.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unused => "UNUSED",
            Self::Used => "USED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Parse the system-of-record string form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "UNUSED" => Some(Self::Unused),
            "USED" => Some(Self::Used),
            "EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable record of a successful, unique (claimant, item) grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim identity (assigned by the system-of-record).
    pub claim_id: ClaimId,
    /// Claimant the unit was granted to.
    pub claimant_id: ClaimantId,
    /// Item the unit was drawn from.
    pub item_id: ItemId,
    /// Redemption status.
    pub status: ClaimStatus,
    /// When the grant was durably recorded.
    pub granted_at: DateTime<Utc>,
}

// ═══════════════════════════════════════════════════════════════════════
// Claim Outcome
// ═══════════════════════════════════════════════════════════════════════

/// Outcome of one atomic check-and-claim against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// One unit of stock was consumed for this claimant.
    Granted,
    /// No stock remained; nothing was consumed.
    Exhausted,
    /// The claimant had already been granted this item; nothing was consumed.
    AlreadyClaimed,
}

// ═══════════════════════════════════════════════════════════════════════
// Detail Cache Snapshot
// ═══════════════════════════════════════════════════════════════════════

/// Serialized snapshot of item + owning event display fields.
///
/// This is what the detail cache holds. It is display metadata only and is
/// never authoritative for stock or window gating — the gate re-checks the
/// ledger's flags and the windows carried here are re-read on every claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Item identity.
    pub item_id: ItemId,
    /// Owning event identity.
    pub event_id: EventId,
    /// Item display name.
    pub item_name: String,
    /// Item display description.
    pub item_detail: Option<String>,
    /// Item application window start.
    pub apply_starts_at: DateTime<Utc>,
    /// Item application window end.
    pub apply_ends_at: DateTime<Utc>,
    /// Total supply as configured in the system-of-record.
    pub total_supply: i32,
    /// Event display name.
    pub event_name: String,
    /// Event window start.
    pub event_starts_at: DateTime<Utc>,
    /// Event window end.
    pub event_ends_at: DateTime<Utc>,
}

impl ItemSnapshot {
    /// Build a snapshot from catalog rows.
    #[must_use]
    pub fn from_catalog(item: &Item, event: &Event) -> Self {
        Self {
            item_id: item.item_id,
            event_id: event.event_id,
            item_name: item.name.clone(),
            item_detail: item.detail.clone(),
            apply_starts_at: item.apply_starts_at,
            apply_ends_at: item.apply_ends_at,
            total_supply: item.total_supply,
            event_name: event.name.clone(),
            event_starts_at: event.starts_at,
            event_ends_at: event.ends_at,
        }
    }

    /// Reconstruct the item half of the snapshot.
    #[must_use]
    pub fn item(&self) -> Item {
        Item {
            item_id: self.item_id,
            event_id: self.event_id,
            name: self.item_name.clone(),
            detail: self.item_detail.clone(),
            apply_starts_at: self.apply_starts_at,
            apply_ends_at: self.apply_ends_at,
            total_supply: self.total_supply,
        }
    }

    /// Reconstruct the event half of the snapshot.
    #[must_use]
    pub fn event(&self) -> Event {
        Event {
            event_id: self.event_id,
            name: self.event_name.clone(),
            detail: None,
            starts_at: self.event_starts_at,
            ends_at: self.event_ends_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_event() -> Event {
        Event {
            event_id: EventId(7),
            name: "spring drop".to_string(),
            detail: Some("seasonal".to_string()),
            starts_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).single().unwrap(),
        }
    }

    fn sample_item(event: &Event) -> Item {
        Item {
            item_id: ItemId(42),
            event_id: event.event_id,
            name: "10% off".to_string(),
            detail: None,
            apply_starts_at: event.starts_at,
            apply_ends_at: event.ends_at,
            total_supply: 100,
        }
    }

    #[test]
    fn snapshot_round_trips_display_fields() {
        let event = sample_event();
        let item = sample_item(&event);
        let snapshot = ItemSnapshot::from_catalog(&item, &event);

        assert_eq!(snapshot.item(), item);
        let restored = snapshot.event();
        assert_eq!(restored.event_id, event.event_id);
        assert_eq!(restored.starts_at, event.starts_at);
        assert_eq!(restored.ends_at, event.ends_at);
        // Event detail is display-only and not carried by the snapshot.
        assert_eq!(restored.detail, None);
    }

    #[test]
    fn claim_status_string_forms_round_trip() {
        for status in [ClaimStatus::Unused, ClaimStatus::Used, ClaimStatus::Expired] {
            assert_eq!(ClaimStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ClaimStatus::parse("NOT_A_STATUS"), None);
    }

    #[test]
    fn snapshot_serializes_as_json() {
        let event = sample_event();
        let item = sample_item(&event);
        let snapshot = ItemSnapshot::from_catalog(&item, &event);

        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        assert!(json.contains("\"item_id\":42"));
        let back: ItemSnapshot = match serde_json::from_str(&json) {
            Ok(s) => s,
            Err(e) => panic!("snapshot json should round-trip: {e}"),
        };
        assert_eq!(back, snapshot);
    }
}
