//! PostgreSQL claim repository.
//!
//! One insert per grant. The `claims_unique_grant` index refuses a second
//! row for the same (claimant, item) pair regardless of what the ledger
//! believed — the durable side's own line of defense.

use flashdrop_core::error::Result;
use flashdrop_core::{Claim, ClaimId, ClaimStatus, ClaimantId, IssueError, ItemId};
use flashdrop_engine::providers::{ClaimRepository, OwnedClaim};
use sqlx::PgPool;

/// PostgreSQL-backed [`ClaimRepository`].
#[derive(Clone)]
pub struct PostgresClaimRepository {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct ClaimRow {
    claim_id: i64,
    claimant_id: i64,
    item_id: i64,
    status: String,
    granted_at: chrono::DateTime<chrono::Utc>,
}

impl ClaimRow {
    fn into_claim(self) -> Result<Claim> {
        let status = ClaimStatus::parse(&self.status).ok_or_else(|| {
            IssueError::StoreUnavailable(format!(
                "Claim {} carries unknown status {:?}",
                self.claim_id, self.status
            ))
        })?;
        Ok(Claim {
            claim_id: ClaimId(self.claim_id),
            claimant_id: ClaimantId(self.claimant_id),
            item_id: ItemId(self.item_id),
            status,
            granted_at: self.granted_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OwnedClaimRow {
    claim_id: i64,
    claimant_id: i64,
    item_id: i64,
    status: String,
    granted_at: chrono::DateTime<chrono::Utc>,
    item_name: String,
    item_detail: Option<String>,
}

impl PostgresClaimRepository {
    /// Create a claim repository over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ClaimRepository for PostgresClaimRepository {
    async fn insert_claim(&self, claimant_id: ClaimantId, item_id: ItemId) -> Result<Claim> {
        let row = sqlx::query_as::<_, ClaimRow>(
            r"
            INSERT INTO claims (claimant_id, item_id, status)
            VALUES ($1, $2, $3)
            RETURNING claim_id, claimant_id, item_id, status, granted_at
            ",
        )
        .bind(claimant_id.0)
        .bind(item_id.0)
        .bind(ClaimStatus::Unused.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    // The ledger's claimed-set should have refused this
                    // first; the index catching it means the fast path and
                    // the record disagree.
                    tracing::warn!(
                        claimant_id = %claimant_id,
                        item_id = %item_id,
                        "Uniqueness index refused a claim the ledger granted"
                    );
                    return IssueError::AlreadyClaimed { claimant_id, item_id };
                }
            }
            IssueError::PersistenceFailure(format!("Failed to insert claim: {e}"))
        })?;

        row.into_claim()
    }

    async fn claims_for_claimant(&self, claimant_id: ClaimantId) -> Result<Vec<OwnedClaim>> {
        let rows = sqlx::query_as::<_, OwnedClaimRow>(
            r"
            SELECT c.claim_id, c.claimant_id, c.item_id, c.status, c.granted_at,
                   i.name AS item_name, i.detail AS item_detail
            FROM claims c
            JOIN items i ON i.item_id = c.item_id
            WHERE c.claimant_id = $1
            ORDER BY c.claim_id DESC
            ",
        )
        .bind(claimant_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| IssueError::StoreUnavailable(format!("Failed to list claims: {e}")))?;

        rows.into_iter()
            .map(|row| {
                let claim = ClaimRow {
                    claim_id: row.claim_id,
                    claimant_id: row.claimant_id,
                    item_id: row.item_id,
                    status: row.status,
                    granted_at: row.granted_at,
                }
                .into_claim()?;
                Ok(OwnedClaim { claim, item_name: row.item_name, item_detail: row.item_detail })
            })
            .collect()
    }
}
