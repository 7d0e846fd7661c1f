//! Claimant profile endpoint.
//!
//! `GET /claimants/:claimant_id` — identity plus every claim the claimant
//! holds, joined with item display fields.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use flashdrop_core::{ClaimStatus, ClaimantId};
use flashdrop_engine::providers::{CatalogRepository, ClaimRepository, OwnedClaim};
use serde::Serialize;

/// One claim on a profile.
#[derive(Debug, Serialize)]
pub struct OwnedClaimResponse {
    /// Durable claim id.
    pub claim_id: i64,
    /// Item the claim is for.
    pub item_id: i64,
    /// Item display name.
    pub item_name: String,
    /// Item display description.
    pub item_detail: Option<String>,
    /// Redemption status.
    pub status: ClaimStatus,
    /// When the claim was granted.
    pub granted_at: DateTime<Utc>,
}

impl From<OwnedClaim> for OwnedClaimResponse {
    fn from(owned: OwnedClaim) -> Self {
        Self {
            claim_id: owned.claim.claim_id.0,
            item_id: owned.claim.item_id.0,
            item_name: owned.item_name,
            item_detail: owned.item_detail,
            status: owned.claim.status,
            granted_at: owned.claim.granted_at,
        }
    }
}

/// Claimant profile.
#[derive(Debug, Serialize)]
pub struct ClaimantResponse {
    /// Claimant id.
    pub claimant_id: i64,
    /// Login handle.
    pub login_id: String,
    /// Claims held, newest first.
    pub claims: Vec<OwnedClaimResponse>,
}

/// Fetch a claimant with their claims.
pub async fn get_claimant(
    Path(claimant_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ClaimantResponse>, AppError> {
    let claimant = state.catalog.claimant(ClaimantId(claimant_id)).await?;
    let claims = state.claims.claims_for_claimant(claimant.claimant_id).await?;

    Ok(Json(ClaimantResponse {
        claimant_id: claimant.claimant_id.0,
        login_id: claimant.login_id,
        claims: claims.into_iter().map(OwnedClaimResponse::from).collect(),
    }))
}
