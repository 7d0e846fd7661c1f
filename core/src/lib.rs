//! # flashdrop core
//!
//! Domain types and shared contracts for the flashdrop issuance engine.
//!
//! A flash-sale deployment races many concurrent claimants against a
//! strictly limited per-item supply. This crate holds the vocabulary every
//! other crate speaks:
//!
//! - [`types`] — items, events, claimants, claims and the claim outcome
//! - [`error`] — the issuance error taxonomy and its HTTP-agnostic kinds
//! - [`config`] — explicit configuration passed into the engine
//!
//! The crate performs no I/O and has no store dependencies; the engine and
//! store crates build on top of it.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{CacheConfig, EngineConfig, RateLimitConfig};
pub use error::{ErrorKind, IssueError, Result};
pub use types::{
    Claim, ClaimId, ClaimOutcome, ClaimStatus, Claimant, ClaimantId, Event, EventId, Item, ItemId,
    ItemSnapshot,
};
