//! # flashdrop web
//!
//! Thin HTTP plumbing over the issuance engine: an axum router, the
//! error-to-status bridge, environment-driven configuration and the
//! application state wiring. Everything that decides whether a claim
//! succeeds lives in `flashdrop-engine`; this crate only parses requests
//! and shapes responses.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod state;

pub use config::Config;
pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
