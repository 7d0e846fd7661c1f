//! End-to-end orchestrator tests over the in-memory providers.
//!
//! The mock ledger reproduces the store's atomicity under one lock, so the
//! supply and uniqueness properties can be exercised with real task-level
//! concurrency at memory speed.

#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::{Duration as ChronoDuration, Utc};
use flashdrop_core::{
    Claimant, ClaimantId, EngineConfig, ErrorKind, Event, EventId, IssueError, Item, ItemId,
};
use flashdrop_engine::mocks::{
    MockActivationFlags, MockCatalog, MockClaimRepository, MockDetailCache, MockRateLimiter,
    MockStockLedger,
};
use flashdrop_engine::{ActivationService, Issuer, keys};
use std::time::Duration;

type TestIssuer = Issuer<
    MockCatalog,
    MockClaimRepository,
    MockStockLedger,
    MockRateLimiter,
    MockActivationFlags,
    MockDetailCache,
>;

const EVENT: EventId = EventId(1);
const ITEM: ItemId = ItemId(100);

/// All the moving parts of one test deployment.
struct World {
    catalog: MockCatalog,
    claims: MockClaimRepository,
    ledger: MockStockLedger,
    limiter: MockRateLimiter,
    flags: MockActivationFlags,
    cache: MockDetailCache,
    issuer: TestIssuer,
}

impl World {
    /// Catalog seeded with one live event owning one item, claimants 1..=50.
    fn new(supply: i32, config: EngineConfig) -> Self {
        let now = Utc::now();
        let catalog = MockCatalog::new();
        catalog.insert_event(Event {
            event_id: EVENT,
            name: "launch drop".to_string(),
            detail: None,
            starts_at: now - ChronoDuration::hours(1),
            ends_at: now + ChronoDuration::hours(1),
        });
        catalog.insert_item(Item {
            item_id: ITEM,
            event_id: EVENT,
            name: "welcome coupon".to_string(),
            detail: Some("10% off".to_string()),
            apply_starts_at: now - ChronoDuration::hours(1),
            apply_ends_at: now + ChronoDuration::hours(1),
            total_supply: supply,
        });
        for id in 1..=50 {
            catalog.insert_claimant(Claimant {
                claimant_id: ClaimantId(id),
                login_id: format!("claimant-{id}"),
            });
        }

        let claims = MockClaimRepository::new();
        let ledger = MockStockLedger::new();
        let limiter = MockRateLimiter::new();
        let flags = MockActivationFlags::new();
        let cache = MockDetailCache::new();
        let issuer = Issuer::new(
            catalog.clone(),
            claims.clone(),
            ledger.clone(),
            limiter.clone(),
            flags.clone(),
            cache.clone(),
            config,
        );
        Self { catalog, claims, ledger, limiter, flags, cache, issuer }
    }

    /// A world whose event has been administratively activated.
    async fn activated(supply: i32) -> Self {
        let world = Self::new(supply, EngineConfig::default());
        world.activate().await;
        world
    }

    async fn activate(&self) {
        ActivationService::new(self.catalog.clone(), self.ledger.clone(), self.flags.clone())
            .activate_event(EVENT, Utc::now())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn grant_persists_and_decrements() {
    let world = World::activated(5).await;

    let claim = world.issuer.issue(ClaimantId(1), ITEM, Some("10.0.0.1")).await.unwrap();
    assert_eq!(claim.claimant_id, ClaimantId(1));
    assert_eq!(claim.item_id, ITEM);
    assert_eq!(claim.status, flashdrop_core::ClaimStatus::Unused);

    assert_eq!(world.ledger.remaining(ITEM), Some(4));
    assert!(world.ledger.has_claimed(ITEM, ClaimantId(1)));
    assert_eq!(world.claims.len(), 1);
}

#[tokio::test]
async fn concurrent_distinct_claimants_never_oversell() {
    let supply = 3;
    let attempts = 10;
    let world = World::activated(supply).await;

    let handles = (1..=attempts).map(|id| {
        let issuer = world.issuer.clone();
        tokio::spawn(async move { issuer.issue(ClaimantId(id), ITEM, None).await })
    });

    let mut granted = 0;
    let mut exhausted = 0;
    for result in futures::future::join_all(handles).await {
        match result.unwrap() {
            Ok(_) => granted += 1,
            Err(IssueError::Exhausted { .. }) => exhausted += 1,
            Err(other) => panic!("unexpected outcome: {other}"),
        }
    }

    assert_eq!(granted, supply);
    assert_eq!(i32::try_from(attempts).unwrap(), granted + exhausted);
    assert_eq!(world.ledger.remaining(ITEM), Some(0));
    assert_eq!(world.claims.len(), usize::try_from(supply).unwrap());
}

#[tokio::test]
async fn duplicate_claimant_refused_without_consuming_stock() {
    let world = World::activated(5).await;

    world.issuer.issue(ClaimantId(2), ITEM, None).await.unwrap();
    let err = world.issuer.issue(ClaimantId(2), ITEM, None).await.unwrap_err();

    assert!(matches!(err, IssueError::AlreadyClaimed { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(world.ledger.remaining(ITEM), Some(4));
    assert_eq!(world.claims.len(), 1);
}

#[tokio::test]
async fn two_claimants_race_for_the_last_unit() {
    let world = World::activated(1).await;

    let a = world.issuer.clone();
    let b = world.issuer.clone();
    let (res_a, res_b) = tokio::join!(
        tokio::spawn(async move { a.issue(ClaimantId(1), ITEM, None).await }),
        tokio::spawn(async move { b.issue(ClaimantId(2), ITEM, None).await }),
    );
    let res_a = res_a.unwrap();
    let res_b = res_b.unwrap();

    let winners = [&res_a, &res_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "exactly one racer wins the last unit");

    let winner = if res_a.is_ok() { ClaimantId(1) } else { ClaimantId(2) };
    let loser = if res_a.is_ok() { ClaimantId(2) } else { ClaimantId(1) };
    assert_eq!(world.ledger.remaining(ITEM), Some(0));
    assert!(world.ledger.has_claimed(ITEM, winner));
    assert!(!world.ledger.has_claimed(ITEM, loser));
}

#[tokio::test]
async fn persistence_failure_compensates_the_ledger() {
    let world = World::activated(2).await;
    world.claims.fail_inserts(true);

    let err = world.issuer.issue(ClaimantId(3), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::PersistenceFailure(_)));

    // The grant was reversed: full stock, empty claimed-set, no record.
    assert_eq!(world.ledger.remaining(ITEM), Some(2));
    assert!(!world.ledger.has_claimed(ITEM, ClaimantId(3)));
    assert!(world.claims.is_empty());

    // Once the system-of-record recovers the same claimant succeeds.
    world.claims.fail_inserts(false);
    world.issuer.issue(ClaimantId(3), ITEM, None).await.unwrap();
    assert_eq!(world.ledger.remaining(ITEM), Some(1));
}

#[tokio::test]
async fn rollback_failure_is_escalated_distinctly() {
    let world = World::activated(2).await;
    world.claims.fail_inserts(true);
    world.ledger.fail_rollback(true);

    let err = world.issuer.issue(ClaimantId(4), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::RollbackFailed { .. }));
    assert!(err.is_integrity_risk());
    // Not masked as the persistence error: operators must see divergence.
    assert_ne!(err.kind(), ErrorKind::Unavailable);
}

#[tokio::test]
async fn unknown_item_and_claimant_have_no_side_effects() {
    let world = World::activated(2).await;

    let err = world.issuer.issue(ClaimantId(1), ItemId(999), None).await.unwrap_err();
    assert!(matches!(err, IssueError::ItemNotFound(_)));

    let err = world.issuer.issue(ClaimantId(999), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::ClaimantNotFound(_)));

    // No stock movement, no claim rows, no rate counting for either.
    assert_eq!(world.ledger.remaining(ITEM), Some(2));
    assert!(world.claims.is_empty());
    assert_eq!(world.limiter.attempts(&keys::rate_claimant(ClaimantId(1))), 0);
    assert_eq!(world.limiter.attempts(&keys::rate_claimant(ClaimantId(999))), 0);
}

#[tokio::test]
async fn unactivated_event_refuses_claims() {
    let world = World::new(2, EngineConfig::default());

    let err = world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::EventInactive { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(world.ledger.remaining(ITEM), None, "ledger never touched");
}

#[tokio::test]
async fn expired_flag_refuses_even_with_live_window() {
    let world = World::activated(2).await;
    world.flags.expire_event(EVENT);

    let err = world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::EventInactive { .. }));
}

#[tokio::test]
async fn rate_limit_denies_after_max_attempts() {
    let config = EngineConfig::new().with_rate_limit(Duration::from_secs(60), 2);
    let world = World::new(5, config);
    world.activate().await;

    // Attempt 1: granted. Attempt 2: duplicate conflict (still counted).
    world.issuer.issue(ClaimantId(5), ITEM, None).await.unwrap();
    let err = world.issuer.issue(ClaimantId(5), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::AlreadyClaimed { .. }));

    // Attempt 3: the window budget is spent before the ledger is reached.
    let err = world.issuer.issue(ClaimantId(5), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::RateLimited));
    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert_eq!(world.limiter.attempts(&keys::rate_claimant(ClaimantId(5))), 3);
}

#[tokio::test]
async fn shared_origin_is_limited_across_claimants() {
    let config = EngineConfig::new().with_rate_limit(Duration::from_secs(60), 2);
    let world = World::new(50, config);
    world.activate().await;

    world.issuer.issue(ClaimantId(10), ITEM, Some("203.0.113.7")).await.unwrap();
    world.issuer.issue(ClaimantId(11), ITEM, Some("203.0.113.7")).await.unwrap();

    let err = world
        .issuer
        .issue(ClaimantId(12), ITEM, Some("203.0.113.7"))
        .await
        .unwrap_err();
    assert!(matches!(err, IssueError::RateLimited));
}

#[tokio::test]
async fn cache_keeps_the_catalog_off_the_hot_path() {
    let world = World::activated(5).await;

    world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap();
    assert_eq!(world.catalog.item_lookups(), 1);
    assert_eq!(world.cache.len(), 1);

    // Subsequent claims resolve from the snapshot alone.
    world.issuer.issue(ClaimantId(2), ITEM, None).await.unwrap();
    world.issuer.issue(ClaimantId(3), ITEM, None).await.unwrap();
    assert_eq!(world.catalog.item_lookups(), 1);
}

#[tokio::test]
async fn corrupt_cache_entry_falls_through_to_catalog() {
    let world = World::activated(5).await;
    world.cache.put_raw(ITEM, "{definitely not a snapshot", Duration::from_secs(60));

    let (item, event) = world.issuer.resolve_item(ITEM).await.unwrap();
    assert_eq!(item.item_id, ITEM);
    assert_eq!(event.event_id, EVENT);
    assert_eq!(world.catalog.item_lookups(), 1, "corruption reads as a miss");
}

#[tokio::test]
async fn item_window_gates_only_when_configured() {
    let now = Utc::now();
    let config = EngineConfig::new().with_item_window_gating(true);
    let world = World::new(5, config);
    // Shrink the item's application window into the past.
    world.catalog.insert_item(Item {
        item_id: ITEM,
        event_id: EVENT,
        name: "welcome coupon".to_string(),
        detail: None,
        apply_starts_at: now - ChronoDuration::hours(2),
        apply_ends_at: now - ChronoDuration::hours(1),
        total_supply: 5,
    });
    world.activate().await;

    let err = world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::ItemWindowClosed { .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn ledger_outage_is_unavailable_not_conflict() {
    let world = World::activated(5).await;
    world.ledger.fail_all(true);

    let err = world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap_err();
    assert!(matches!(err, IssueError::StoreUnavailable(_)));
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    assert!(err.is_integrity_risk());
}

#[tokio::test]
async fn activation_is_idempotent_over_consumed_stock() {
    let world = World::activated(3).await;
    let service =
        ActivationService::new(world.catalog.clone(), world.ledger.clone(), world.flags.clone());

    world.issuer.issue(ClaimantId(1), ITEM, None).await.unwrap();
    assert_eq!(world.ledger.remaining(ITEM), Some(2));

    // Re-activation refreshes flags but leaves the live counter alone.
    let summary = service.activate_event(EVENT, Utc::now()).await.unwrap();
    assert_eq!(summary.items_total, 1);
    assert_eq!(summary.items_initialized, 0);
    assert_eq!(world.ledger.remaining(ITEM), Some(2));
}

#[tokio::test]
async fn activating_an_ended_event_is_refused() {
    let world = World::new(2, EngineConfig::default());
    let service =
        ActivationService::new(world.catalog.clone(), world.ledger.clone(), world.flags.clone());

    let err = service
        .activate_event(EVENT, Utc::now() + ChronoDuration::hours(3))
        .await
        .unwrap_err();
    assert!(matches!(err, IssueError::EventEnded { .. }));
    assert_eq!(world.ledger.remaining(ITEM), None);
}
