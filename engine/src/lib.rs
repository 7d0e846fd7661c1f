//! # flashdrop engine
//!
//! The issuance coordination engine behind flash-sale coupon drops: many
//! concurrent claimants race for a strictly limited supply, and each unit
//! is granted to at most one claimant, never exceeding the configured
//! stock.
//!
//! ## Architecture
//!
//! ```text
//! claim request
//!     │
//!     ▼
//! Issuer ── detail cache ──► catalog (system-of-record, miss only)
//!     │
//!     ├─ availability gate (event flag + window, pure)
//!     ├─ rate limiter      (fixed-window counters, attempt counted)
//!     ├─ stock ledger      (one atomic script: dup-check → DECR → SADD)
//!     └─ claim repository  (durable insert; failure → ledger rollback)
//! ```
//!
//! Correctness is delegated entirely to the ledger's single atomic script;
//! no in-process lock is held across the claim path. The system-of-record
//! stays consistent with the fast-path counter through the orchestrator's
//! compensation step, never through the ledger itself.
//!
//! External collaborators (HTTP routing, authentication, response shaping)
//! live outside this crate and hand the engine a resolved [`ClaimantId`].
//!
//! [`ClaimantId`]: flashdrop_core::ClaimantId

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod activation;
pub mod gate;
pub mod issuer;
pub mod keys;
pub mod providers;
pub mod stores;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use activation::{ActivationService, ActivationSummary};
pub use issuer::Issuer;
