//! Atomic stock ledger trait.
//!
//! The ledger is the sole source of truth for "is stock available" and
//! "has this claimant already claimed". All three operations must be safe
//! under unbounded concurrent callers; `try_claim` in particular must be
//! one indivisible operation against the store.

use flashdrop_core::error::Result;
use flashdrop_core::{ClaimOutcome, ClaimantId, ItemId};

/// Atomic per-item stock counter plus claimed-set.
///
/// # Contract
///
/// For a fixed item initialized with supply `S`:
/// - the number of [`ClaimOutcome::Granted`] outcomes across all time never
///   exceeds `S`;
/// - no claimant observes more than one `Granted`;
/// - a duplicate claimant never consumes stock (the membership check runs
///   strictly before the decrement).
///
/// A request that timed out against the store has an *indeterminate*
/// outcome; callers retry the whole request and rely on
/// [`ClaimOutcome::AlreadyClaimed`] to detect a grant that did land.
pub trait StockLedger: Send + Sync {
    /// Atomically attempt to claim one unit of `item_id` for `claimant_id`.
    ///
    /// Executes, as a single indivisible operation:
    /// 1. membership check of the claimed-set (hit → `AlreadyClaimed`, no
    ///    mutation);
    /// 2. decrement of the remaining count;
    /// 3. if the count went negative, undo the decrement → `Exhausted`;
    /// 4. otherwise add the claimant to the claimed-set → `Granted`.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] if the store itself failed;
    /// the outcome is then unknown, not negative.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn try_claim(
        &self,
        item_id: ItemId,
        claimant_id: ClaimantId,
    ) -> impl Future<Output = Result<ClaimOutcome>> + Send;

    /// Initialize the remaining count to `total_supply` only if the stock
    /// key does not exist yet.
    ///
    /// Repeated calls are no-ops once consumption has started; an evicted
    /// ledger entry is re-created from the item's configured supply without
    /// ever overwriting a live counter.
    ///
    /// Returns `true` if this call created the key.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn init_if_absent(
        &self,
        item_id: ItemId,
        total_supply: i32,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Undo a `Granted` outcome whose downstream persistence failed:
    /// restore one unit of stock and remove the claimant from the
    /// claimed-set.
    ///
    /// Best effort. A failure here means the ledger and the
    /// system-of-record have diverged; the caller must escalate it as a
    /// fatal, alert-worthy error rather than swallow it.
    ///
    /// # Errors
    ///
    /// Returns [`IssueError::StoreUnavailable`] on store failure.
    ///
    /// [`IssueError::StoreUnavailable`]: flashdrop_core::IssueError::StoreUnavailable
    fn rollback(
        &self,
        item_id: ItemId,
        claimant_id: ClaimantId,
    ) -> impl Future<Output = Result<()>> + Send;
}
