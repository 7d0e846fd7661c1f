//! Claim issuance endpoint.
//!
//! `POST /items/:item_id/claims/:claimant_id` — race for one unit.
//!
//! The claimant id arrives in the path: session handling is deliberately
//! outside this service, and upstream middleware is expected to have
//! resolved the caller's identity before the request reaches us.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
};
use chrono::{DateTime, Utc};
use flashdrop_core::{ClaimStatus, ClaimantId, ItemId};
use serde::Serialize;
use std::net::SocketAddr;

/// Header carrying the original client address behind proxies.
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Response for a granted claim.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    /// Durable claim id.
    pub claim_id: i64,
    /// Item the unit came from.
    pub item_id: i64,
    /// Claimant the unit went to.
    pub claimant_id: i64,
    /// Redemption status (always UNUSED on grant).
    pub status: ClaimStatus,
    /// When the grant was recorded.
    pub granted_at: DateTime<Utc>,
}

/// Resolve the request's network origin for the per-origin rate counter.
///
/// Takes the first hop of `X-Forwarded-For` when present, otherwise the
/// peer address. Returns `None` when neither yields anything usable, in
/// which case the origin counter is skipped.
fn resolve_origin(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    match forwarded {
        Some(first) => Some(first.to_string()),
        None => peer.map(|addr| addr.ip().to_string()),
    }
}

/// Issue one unit of an item to a claimant.
pub async fn issue_claim(
    Path((item_id, claimant_id)): Path<(i64, i64)>,
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<ClaimResponse>, AppError> {
    let origin = resolve_origin(&headers, Some(peer));

    let claim = state
        .issuer
        .issue(ClaimantId(claimant_id), ItemId(item_id), origin.as_deref())
        .await?;

    Ok(Json(ClaimResponse {
        claim_id: claim.claim_id.0,
        item_id: claim.item_id.0,
        claimant_id: claim.claimant_id.0,
        status: claim.status,
        granted_at: claim.granted_at,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "192.0.2.10:40000".parse().unwrap()
    }

    #[test]
    fn forwarded_header_wins_over_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.5, 10.0.0.1"),
        );
        assert_eq!(
            resolve_origin(&headers, Some(peer())),
            Some("203.0.113.5".to_string())
        );
    }

    #[test]
    fn falls_back_to_peer_address() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_origin(&headers, Some(peer())), Some("192.0.2.10".to_string()));
    }

    #[test]
    fn blank_forwarded_header_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("   "));
        assert_eq!(resolve_origin(&headers, Some(peer())), Some("192.0.2.10".to_string()));
    }

    #[test]
    fn nothing_usable_skips_the_origin_counter() {
        let headers = HeaderMap::new();
        assert_eq!(resolve_origin(&headers, None), None);
    }
}
