//! Router configuration.

use crate::handlers::{admin, catalog, claimants, claims, health};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Build the complete Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check (no state requirements beyond serving)
        .route("/health", get(health::health_check))
        // Catalog reads
        .route("/events", get(catalog::list_events))
        .route("/events/:event_id", get(catalog::get_event))
        .route("/events/:event_id/items", get(catalog::list_event_items))
        .route("/items/:item_id", get(catalog::get_item))
        // The hot path
        .route("/items/:item_id/claims/:claimant_id", post(claims::issue_claim))
        // Claimant profile
        .route("/claimants/:claimant_id", get(claimants::get_claimant))
        // Administration
        .route("/admin/events/:event_id/activate", post(admin::activate_event))
        .with_state(state)
}
