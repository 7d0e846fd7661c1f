//! Business metrics for the issuance engine.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `flashdrop_claims_total{outcome}` - Claim attempts by outcome
//!   (granted, duplicate, exhausted, `rate_limited`)
//! - `flashdrop_rollbacks_total{result}` - Ledger compensations by result
//!   (ok, failed) — a nonzero `failed` count means the ledger and the
//!   system-of-record have diverged and need manual reconciliation

use metrics::describe_counter;

/// Register metric descriptions.
///
/// Call once at startup, before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "flashdrop_claims_total",
        "Total claim attempts by outcome (granted, duplicate, exhausted, rate_limited)"
    );
    describe_counter!(
        "flashdrop_rollbacks_total",
        "Ledger compensations after persistence failures, by result (ok, failed)"
    );

    tracing::info!("Business metrics registered");
}
