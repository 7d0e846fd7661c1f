//! Administrative endpoints.
//!
//! `POST /admin/events/:event_id/activate` — open an event for claiming:
//! seed every item's ledger entry from its configured supply and plant the
//! activation flags with a TTL bound to the event's end.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use flashdrop_core::EventId;
use serde::Serialize;

/// Result of an activation run.
#[derive(Debug, Serialize)]
pub struct ActivationResponse {
    /// Activated event.
    pub event_id: i64,
    /// Items belonging to the event.
    pub items_total: usize,
    /// Items whose ledger entry was created by this run.
    pub items_initialized: usize,
    /// When the activation flags lapse.
    pub active_until: DateTime<Utc>,
}

/// Activate an event.
pub async fn activate_event(
    Path(event_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ActivationResponse>, AppError> {
    let summary = state.activation.activate_event(EventId(event_id), Utc::now()).await?;

    Ok(Json(ActivationResponse {
        event_id: summary.event_id.0,
        items_total: summary.items_total,
        items_initialized: summary.items_initialized,
        active_until: summary.active_until,
    }))
}
