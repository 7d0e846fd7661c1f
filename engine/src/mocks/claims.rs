//! In-memory claim repository for testing.

use crate::providers::{ClaimRepository, OwnedClaim};
use chrono::Utc;
use flashdrop_core::error::Result;
use flashdrop_core::{Claim, ClaimId, ClaimStatus, ClaimantId, IssueError, ItemId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory [`ClaimRepository`] enforcing the (claimant, item) uniqueness
/// constraint the way the system-of-record's index would.
///
/// [`fail_inserts`](Self::fail_inserts) injects persistence failures for
/// exercising the compensation path.
#[derive(Debug, Clone, Default)]
pub struct MockClaimRepository {
    claims: Arc<Mutex<Vec<Claim>>>,
    display: Arc<Mutex<HashMap<ItemId, (String, Option<String>)>>>,
    next_id: Arc<AtomicI64>,
    fail_inserts: Arc<AtomicBool>,
}

impl MockClaimRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert fail with a persistence error.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Register display fields used when joining claims for a profile.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[allow(clippy::unwrap_used)]
    pub fn insert_item_display(&self, item_id: ItemId, name: &str, detail: Option<&str>) {
        self.display
            .lock()
            .unwrap()
            .insert(item_id, (name.to_string(), detail.map(ToString::to_string)));
    }

    /// Number of stored claims.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.claims.lock().unwrap().len()
    }

    /// True when no claims are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ClaimRepository for MockClaimRepository {
    async fn insert_claim(&self, claimant_id: ClaimantId, item_id: ItemId) -> Result<Claim> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(IssueError::PersistenceFailure(
                "injected insert failure".to_string(),
            ));
        }

        let mut claims = self
            .claims
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        // The uniqueness net the real schema enforces with an index.
        if claims.iter().any(|c| c.claimant_id == claimant_id && c.item_id == item_id) {
            return Err(IssueError::AlreadyClaimed { claimant_id, item_id });
        }

        let claim = Claim {
            claim_id: ClaimId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            claimant_id,
            item_id,
            status: ClaimStatus::Unused,
            granted_at: Utc::now(),
        };
        claims.push(claim.clone());
        Ok(claim)
    }

    async fn claims_for_claimant(&self, claimant_id: ClaimantId) -> Result<Vec<OwnedClaim>> {
        let claims = self
            .claims
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;
        let display = self
            .display
            .lock()
            .map_err(|_| IssueError::StoreUnavailable("Mutex lock failed".to_string()))?;

        let mut owned: Vec<OwnedClaim> = claims
            .iter()
            .filter(|c| c.claimant_id == claimant_id)
            .map(|c| {
                let (name, detail) = display
                    .get(&c.item_id)
                    .cloned()
                    .unwrap_or_else(|| (format!("item-{}", c.item_id), None));
                OwnedClaim { claim: c.clone(), item_name: name, item_detail: detail }
            })
            .collect();
        owned.sort_by(|a, b| b.claim.claim_id.0.cmp(&a.claim.claim_id.0));
        Ok(owned)
    }
}
