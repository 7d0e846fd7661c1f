//! Error types for issuance operations.

use crate::types::{ClaimantId, EventId, ItemId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for issuance operations.
pub type Result<T> = std::result::Result<T, IssueError>;

/// Error taxonomy for the issuance engine.
///
/// Variants are grouped by how the caller must treat them: expected
/// business outcomes (not found, conflicts, rate limiting) surface directly
/// with informational logging, while store and reconciliation failures are
/// integrity risks that must be escalated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IssueError {
    // ═══════════════════════════════════════════════════════════
    // Not Found
    // ═══════════════════════════════════════════════════════════
    /// Item does not exist in the system-of-record.
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// Event does not exist in the system-of-record.
    #[error("Event {0} not found")]
    EventNotFound(EventId),

    /// Claimant does not exist in the system-of-record.
    #[error("Claimant {0} not found")]
    ClaimantNotFound(ClaimantId),

    // ═══════════════════════════════════════════════════════════
    // Conflicts (expected business refusals)
    // ═══════════════════════════════════════════════════════════
    /// The event's active flag is absent from the store.
    #[error("Event {event_id} is not active")]
    EventInactive {
        /// Event whose flag was missing.
        event_id: EventId,
    },

    /// The claim arrived before the event window opened.
    #[error("Event {event_id} has not started (starts at {starts_at})")]
    EventNotStarted {
        /// Event being claimed against.
        event_id: EventId,
        /// When the window opens.
        starts_at: DateTime<Utc>,
    },

    /// The claim arrived after the event window closed.
    #[error("Event {event_id} has ended (ended at {ends_at})")]
    EventEnded {
        /// Event being claimed against.
        event_id: EventId,
        /// When the window closed.
        ends_at: DateTime<Utc>,
    },

    /// The claim arrived outside the item's own application window.
    ///
    /// Only produced when item-window gating is enabled in configuration.
    #[error("Item {item_id} is outside its application window")]
    ItemWindowClosed {
        /// Item being claimed.
        item_id: ItemId,
    },

    /// This claimant already holds a grant for this item.
    #[error("Claimant {claimant_id} already claimed item {item_id}")]
    AlreadyClaimed {
        /// Claimant that retried.
        claimant_id: ClaimantId,
        /// Item already granted.
        item_id: ItemId,
    },

    /// The item's remaining stock reached zero.
    #[error("Item {item_id} is exhausted")]
    Exhausted {
        /// Sold-out item.
        item_id: ItemId,
    },

    // ═══════════════════════════════════════════════════════════
    // Rate Limiting
    // ═══════════════════════════════════════════════════════════
    /// The request exceeded the per-claimant or per-origin limit.
    ///
    /// The attempt was counted before the refusal; only expiry resets it.
    #[error("Too many claim attempts")]
    RateLimited,

    // ═══════════════════════════════════════════════════════════
    // Integrity Risks
    // ═══════════════════════════════════════════════════════════
    /// The atomic store itself failed; the outcome is unknown, not negative.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The durable claim write failed after a grant; the ledger was rolled
    /// back before this error was returned.
    #[error("Failed to persist claim: {0}")]
    PersistenceFailure(String),

    /// Ledger rollback failed after a persistence failure.
    ///
    /// The ledger and the system-of-record now disagree for this
    /// (claimant, item) pair until someone reconciles them by hand.
    #[error("Rollback failed for claimant {claimant_id} on item {item_id}: {reason}")]
    RollbackFailed {
        /// Claimant whose grant could not be reversed.
        claimant_id: ClaimantId,
        /// Item whose stock could not be restored.
        item_id: ItemId,
        /// Underlying store failure.
        reason: String,
    },
}

/// Coarse classification of an [`IssueError`], independent of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity is absent; nothing was mutated.
    NotFound,
    /// An expected business refusal (duplicate, sold out, window violation).
    Conflict,
    /// The attempt was counted but not serviced.
    RateLimited,
    /// The store failed; the outcome is indeterminate.
    Unavailable,
    /// A failure after the grant point (persistence or rollback).
    Internal,
}

impl IssueError {
    /// Classify this error for propagation and logging policy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ItemNotFound(_) | Self::EventNotFound(_) | Self::ClaimantNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::EventInactive { .. }
            | Self::EventNotStarted { .. }
            | Self::EventEnded { .. }
            | Self::ItemWindowClosed { .. }
            | Self::AlreadyClaimed { .. }
            | Self::Exhausted { .. } => ErrorKind::Conflict,
            Self::RateLimited => ErrorKind::RateLimited,
            Self::StoreUnavailable(_) => ErrorKind::Unavailable,
            Self::PersistenceFailure(_) | Self::RollbackFailed { .. } => ErrorKind::Internal,
        }
    }

    /// Returns `true` if this error means the ledger and the
    /// system-of-record may disagree and someone must be paged.
    #[must_use]
    pub const fn is_integrity_risk(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::RollbackFailed { .. })
    }
}
