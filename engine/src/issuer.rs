//! Issuance orchestrator.
//!
//! Composes the detail cache, availability gate, rate limiter, stock
//! ledger and claim repository into one bounded claim attempt:
//!
//! ```text
//! resolve item ─ resolve claimant ─ gate ─ rate limit ─ ledger ─ persist
//! ```
//!
//! Every stage is terminal on first failure. There is no retry loop —
//! tail latency stays predictable under load and callers retry the whole
//! request externally, relying on the ledger's `AlreadyClaimed` outcome to
//! detect a grant that landed before a timeout.

use crate::gate;
use crate::providers::{
    ActivationFlags, CatalogRepository, ClaimRepository, DetailCache, RateLimiter, StockLedger,
};
use chrono::Utc;
use flashdrop_core::error::Result;
use flashdrop_core::{
    Claim, ClaimOutcome, ClaimantId, EngineConfig, Event, IssueError, Item, ItemId, ItemSnapshot,
};
use metrics::counter;

/// The issuance orchestrator.
///
/// Holds one instance of each provider plus the engine configuration; all
/// dependencies are injected so the whole claim path runs against mocks at
/// memory speed in tests.
///
/// # Type Parameters
///
/// - `Cat`: catalog repository (system-of-record reads)
/// - `Cl`: claim repository (system-of-record writes)
/// - `L`: stock ledger
/// - `R`: rate limiter
/// - `F`: activation flags
/// - `D`: detail cache
#[derive(Clone)]
pub struct Issuer<Cat, Cl, L, R, F, D>
where
    Cat: CatalogRepository + Clone,
    Cl: ClaimRepository + Clone,
    L: StockLedger + Clone,
    R: RateLimiter + Clone,
    F: ActivationFlags + Clone,
    D: DetailCache + Clone,
{
    catalog: Cat,
    claims: Cl,
    ledger: L,
    limiter: R,
    flags: F,
    cache: D,
    config: EngineConfig,
}

impl<Cat, Cl, L, R, F, D> Issuer<Cat, Cl, L, R, F, D>
where
    Cat: CatalogRepository + Clone,
    Cl: ClaimRepository + Clone,
    L: StockLedger + Clone,
    R: RateLimiter + Clone,
    F: ActivationFlags + Clone,
    D: DetailCache + Clone,
{
    /// Create an orchestrator over the given providers.
    #[must_use]
    pub const fn new(
        catalog: Cat,
        claims: Cl,
        ledger: L,
        limiter: R,
        flags: F,
        cache: D,
        config: EngineConfig,
    ) -> Self {
        Self { catalog, claims, ledger, limiter, flags, cache, config }
    }

    /// The configuration this orchestrator was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve an item and its owning event, cache first.
    ///
    /// A cache hit never touches the system-of-record; a miss (or a
    /// corrupt entry) reads the catalog and writes the snapshot back with
    /// the configured TTL before returning.
    ///
    /// # Errors
    ///
    /// [`IssueError::ItemNotFound`] if the item is unknown,
    /// [`IssueError::StoreUnavailable`] on cache or catalog failure.
    pub async fn resolve_item(&self, item_id: ItemId) -> Result<(Item, Event)> {
        if let Some(snapshot) = self.cache.get(item_id).await? {
            return Ok((snapshot.item(), snapshot.event()));
        }

        let (item, event) = self.catalog.item_with_event(item_id).await?;
        let snapshot = ItemSnapshot::from_catalog(&item, &event);
        self.cache.put(item_id, &snapshot, self.config.cache.detail_ttl).await?;
        Ok((item, event))
    }

    /// Attempt to issue one unit of `item_id` to `claimant_id`.
    ///
    /// `origin` is the caller's network origin for the second rate
    /// counter; pass `None` when it is unknown.
    ///
    /// Exactly one bounded attempt. On success the durable claim record is
    /// returned; on a persistence failure after the grant, the ledger is
    /// rolled back synchronously before the error propagates.
    ///
    /// # Errors
    ///
    /// Any [`IssueError`]; see the crate-level overview for how each kind
    /// maps to a stage of the attempt.
    pub async fn issue(
        &self,
        claimant_id: ClaimantId,
        item_id: ItemId,
        origin: Option<&str>,
    ) -> Result<Claim> {
        let (item, event) = self.resolve_item(item_id).await?;
        self.catalog.claimant(claimant_id).await?;

        let event_active = self.flags.is_event_active(event.event_id).await?;
        gate::check_claim_window(
            &item,
            &event,
            event_active,
            self.config.gate_on_item_window,
            Utc::now(),
        )?;

        let admitted = self
            .limiter
            .admit(
                claimant_id,
                origin,
                self.config.rate_limit.max_requests,
                self.config.rate_limit.window,
            )
            .await?;
        if !admitted {
            counter!("flashdrop_claims_total", "outcome" => "rate_limited").increment(1);
            return Err(IssueError::RateLimited);
        }

        // Reseed an absent (never-activated or evicted) ledger entry from
        // the configured supply; a live counter is left untouched.
        self.ledger.init_if_absent(item_id, item.total_supply).await?;

        match self.ledger.try_claim(item_id, claimant_id).await? {
            ClaimOutcome::AlreadyClaimed => {
                counter!("flashdrop_claims_total", "outcome" => "duplicate").increment(1);
                tracing::info!(
                    claimant_id = %claimant_id,
                    item_id = %item_id,
                    "Duplicate claim refused"
                );
                Err(IssueError::AlreadyClaimed { claimant_id, item_id })
            }
            ClaimOutcome::Exhausted => {
                counter!("flashdrop_claims_total", "outcome" => "exhausted").increment(1);
                tracing::info!(item_id = %item_id, "Claim refused, stock exhausted");
                Err(IssueError::Exhausted { item_id })
            }
            ClaimOutcome::Granted => self.persist_grant(claimant_id, item_id).await,
        }
    }

    /// Durably record a grant, compensating the ledger if the write fails.
    async fn persist_grant(&self, claimant_id: ClaimantId, item_id: ItemId) -> Result<Claim> {
        match self.claims.insert_claim(claimant_id, item_id).await {
            Ok(claim) => {
                counter!("flashdrop_claims_total", "outcome" => "granted").increment(1);
                tracing::info!(
                    claimant_id = %claimant_id,
                    item_id = %item_id,
                    claim_id = %claim.claim_id,
                    "Claim granted and persisted"
                );
                Ok(claim)
            }
            Err(persist_err) => {
                tracing::error!(
                    claimant_id = %claimant_id,
                    item_id = %item_id,
                    error = %persist_err,
                    "Durable claim write failed after grant; rolling back ledger"
                );

                match self.ledger.rollback(item_id, claimant_id).await {
                    Ok(()) => {
                        counter!("flashdrop_rollbacks_total", "result" => "ok").increment(1);
                        Err(persist_err)
                    }
                    Err(rollback_err) => {
                        // The ledger and the system-of-record now disagree;
                        // this needs a human, not a log line that scrolls by.
                        counter!("flashdrop_rollbacks_total", "result" => "failed").increment(1);
                        tracing::error!(
                            claimant_id = %claimant_id,
                            item_id = %item_id,
                            persistence_error = %persist_err,
                            rollback_error = %rollback_err,
                            "Ledger rollback failed; stock accounting has diverged"
                        );
                        Err(IssueError::RollbackFailed {
                            claimant_id,
                            item_id,
                            reason: rollback_err.to_string(),
                        })
                    }
                }
            }
        }
    }
}
