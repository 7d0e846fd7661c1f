//! Claim repository trait.
//!
//! The durable side of a grant: one insert per successful claim, protected
//! by a UNIQUE (claimant, item) constraint as a last-resort net under any
//! ledger-level bug.

use flashdrop_core::error::Result;
use flashdrop_core::{Claim, ClaimStatus, ClaimantId, ItemId};
use serde::Serialize;

/// A claim joined with the display fields of its item, as shown on a
/// claimant's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedClaim {
    /// The durable claim record.
    pub claim: Claim,
    /// Item display name at query time.
    pub item_name: String,
    /// Item display description at query time.
    pub item_detail: Option<String>,
}

impl OwnedClaim {
    /// Redemption status shortcut.
    #[must_use]
    pub const fn status(&self) -> ClaimStatus {
        self.claim.status
    }
}

/// Durable claim writes and per-claimant reads.
pub trait ClaimRepository: Send + Sync {
    /// Insert the durable record of a grant with status
    /// [`ClaimStatus::Unused`]. Exactly one row may ever exist per
    /// (claimant, item) pair.
    ///
    /// # Errors
    ///
    /// [`IssueError::AlreadyClaimed`] if the uniqueness constraint fired
    /// (the ledger should have caught this first — the constraint is the
    /// safety net), [`IssueError::PersistenceFailure`] on any other write
    /// failure.
    ///
    /// [`IssueError::AlreadyClaimed`]: flashdrop_core::IssueError::AlreadyClaimed
    /// [`IssueError::PersistenceFailure`]: flashdrop_core::IssueError::PersistenceFailure
    fn insert_claim(
        &self,
        claimant_id: ClaimantId,
        item_id: ItemId,
    ) -> impl Future<Output = Result<Claim>> + Send;

    /// List the claims a claimant holds, newest first, joined with item
    /// display fields.
    ///
    /// # Errors
    ///
    /// [`IssueError::StoreUnavailable`] on query failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn claims_for_claimant(
        &self,
        claimant_id: ClaimantId,
    ) -> impl Future<Output = Result<Vec<OwnedClaim>>> + Send;
}
