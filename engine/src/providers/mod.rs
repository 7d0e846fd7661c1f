//! Issuance providers.
//!
//! This module defines traits for every external dependency the engine
//! touches. The orchestrator depends only on these traits; the `stores`
//! module provides Redis-backed implementations and `flashdrop-postgres`
//! provides the system-of-record side.
//!
//! This enables:
//! - **Testing**: in-memory mocks, deterministic and fast
//! - **Production**: Redis + PostgreSQL
//!
//! The shared store is accessed exclusively through [`StockLedger`],
//! [`RateLimiter`], [`ActivationFlags`] and [`DetailCache`] — no other
//! code path may mutate ledger or rate keys.

pub mod catalog;
pub mod claims;
pub mod detail_cache;
pub mod flags;
pub mod ledger;
pub mod rate_limiter;

pub use catalog::CatalogRepository;
pub use claims::{ClaimRepository, OwnedClaim};
pub use detail_cache::DetailCache;
pub use flags::ActivationFlags;
pub use ledger::StockLedger;
pub use rate_limiter::RateLimiter;
