//! In-memory stock ledger for testing.

use crate::providers::StockLedger;
use flashdrop_core::error::Result;
use flashdrop_core::{ClaimOutcome, ClaimantId, IssueError, ItemId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One item's ledger state: the remaining count and the claimed-set.
#[derive(Debug, Default)]
struct LedgerEntry {
    remaining: i64,
    claimants: HashSet<ClaimantId>,
}

/// In-memory [`StockLedger`] with the same atomic semantics as the store
/// script: every `try_claim` runs under a single lock, so the duplicate
/// check, decrement and set insertion are indivisible here too.
///
/// Failure injection: [`fail_all`](Self::fail_all) makes every operation
/// return a store error; [`fail_rollback`](Self::fail_rollback) fails only
/// the rollback path, for exercising the divergence escalation.
#[derive(Debug, Clone, Default)]
pub struct MockStockLedger {
    entries: Arc<Mutex<HashMap<ItemId, LedgerEntry>>>,
    fail_all: Arc<AtomicBool>,
    fail_rollback: Arc<AtomicBool>,
}

impl MockStockLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail with a store error.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Make only `rollback` fail with a store error.
    pub fn fail_rollback(&self, fail: bool) {
        self.fail_rollback.store(fail, Ordering::SeqCst);
    }

    /// Current remaining count, if the item was ever touched.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn remaining(&self, item_id: ItemId) -> Option<i64> {
        self.entries.lock().unwrap().get(&item_id).map(|e| e.remaining)
    }

    /// Is the claimant recorded in the item's claimed-set?
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn has_claimed(&self, item_id: ItemId, claimant_id: ClaimantId) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(&item_id)
            .is_some_and(|e| e.claimants.contains(&claimant_id))
    }

    fn check_available(&self) -> Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(IssueError::StoreUnavailable("injected ledger failure".to_string()));
        }
        Ok(())
    }
}

impl StockLedger for MockStockLedger {
    async fn try_claim(&self, item_id: ItemId, claimant_id: ClaimantId) -> Result<ClaimOutcome> {
        self.check_available()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        // A decrement on an absent key behaves like the store: the counter
        // springs into existence at zero and immediately exhausts.
        let entry = entries.entry(item_id).or_default();

        if entry.claimants.contains(&claimant_id) {
            return Ok(ClaimOutcome::AlreadyClaimed);
        }

        entry.remaining -= 1;
        if entry.remaining < 0 {
            entry.remaining += 1;
            return Ok(ClaimOutcome::Exhausted);
        }

        entry.claimants.insert(claimant_id);
        Ok(ClaimOutcome::Granted)
    }

    async fn init_if_absent(&self, item_id: ItemId, total_supply: i32) -> Result<bool> {
        self.check_available()?;
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        if entries.contains_key(&item_id) {
            return Ok(false);
        }
        entries.insert(
            item_id,
            LedgerEntry { remaining: i64::from(total_supply), claimants: HashSet::new() },
        );
        Ok(true)
    }

    async fn rollback(&self, item_id: ItemId, claimant_id: ClaimantId) -> Result<()> {
        self.check_available()?;
        if self.fail_rollback.load(Ordering::SeqCst) {
            return Err(IssueError::StoreUnavailable("injected rollback failure".to_string()));
        }

        let mut entries = self
            .entries
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        let entry = entries.entry(item_id).or_default();
        entry.remaining += 1;
        entry.claimants.remove(&claimant_id);
        Ok(())
    }
}
