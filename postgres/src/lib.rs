//! # flashdrop postgres
//!
//! PostgreSQL implementations of the system-of-record providers:
//!
//! - [`PostgresCatalog`] — query-only reads of events, items and claimants
//! - [`PostgresClaimRepository`] — the durable claim insert (guarded by a
//!   UNIQUE (claimant, item) index) and per-claimant claim listings
//!
//! The Redis ledger decides grants; this crate only records them and
//! serves configuration reads. Queries are runtime-bound (`sqlx::query_as`
//! with `bind`) so the workspace builds without a live `DATABASE_URL`.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod catalog;
pub mod claims;

pub use catalog::PostgresCatalog;
pub use claims::PostgresClaimRepository;

use flashdrop_core::{IssueError, error::Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Open a connection pool against the system-of-record.
///
/// # Errors
///
/// Returns [`IssueError::StoreUnavailable`] if the pool cannot be
/// established.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
        .map_err(|e| {
            IssueError::StoreUnavailable(format!("Failed to connect to PostgreSQL: {e}"))
        })
}

/// Run the embedded schema migrations.
///
/// # Errors
///
/// Returns [`IssueError::StoreUnavailable`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| IssueError::StoreUnavailable(format!("Migration failed: {e}")))?;
    Ok(())
}
