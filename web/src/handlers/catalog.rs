//! Event and item read endpoints.
//!
//! - `GET /events` — list events
//! - `GET /events/:event_id` — one event
//! - `GET /events/:event_id/items` — items of an event
//! - `GET /items/:item_id` — item detail (cache read-through) plus the
//!   live activation flags

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use flashdrop_core::{Event, EventId, Item, ItemId};
use flashdrop_engine::providers::CatalogRepository;
use serde::Serialize;

/// Event display fields.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    /// Event id.
    pub event_id: i64,
    /// Display name.
    pub name: String,
    /// Display description.
    pub detail: Option<String>,
    /// Claim window start.
    pub starts_at: DateTime<Utc>,
    /// Claim window end.
    pub ends_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id.0,
            name: event.name,
            detail: event.detail,
            starts_at: event.starts_at,
            ends_at: event.ends_at,
        }
    }
}

/// Item display fields.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    /// Item id.
    pub item_id: i64,
    /// Owning event id.
    pub event_id: i64,
    /// Display name.
    pub name: String,
    /// Display description.
    pub detail: Option<String>,
    /// Application window start.
    pub apply_starts_at: DateTime<Utc>,
    /// Application window end.
    pub apply_ends_at: DateTime<Utc>,
    /// Configured total supply.
    pub total_supply: i32,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            item_id: item.item_id.0,
            event_id: item.event_id.0,
            name: item.name,
            detail: item.detail,
            apply_starts_at: item.apply_starts_at,
            apply_ends_at: item.apply_ends_at,
            total_supply: item.total_supply,
        }
    }
}

/// Item detail with owning event and live flags.
#[derive(Debug, Serialize)]
pub struct ItemDetailResponse {
    /// The item.
    pub item: ItemResponse,
    /// The owning event.
    pub event: EventResponse,
    /// Is the event's activation flag present right now?
    pub event_active: bool,
    /// Is the item's activation flag present right now?
    pub item_active: bool,
}

/// List all events.
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let events = state.catalog.events().await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// Fetch one event.
pub async fn get_event(
    Path(event_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state.catalog.event(EventId(event_id)).await?;
    Ok(Json(EventResponse::from(event)))
}

/// List the items of an event.
pub async fn list_event_items(
    Path(event_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    // Existence check first so an unknown event is a 404, not an empty list.
    state.catalog.event(EventId(event_id)).await?;
    let items = state.catalog.items_for_event(EventId(event_id)).await?;
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// Fetch one item with its owning event and live activation flags.
///
/// Served from the detail cache when warm; a miss reads the
/// system-of-record and primes the cache for the claim path.
pub async fn get_item(
    Path(item_id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ItemDetailResponse>, AppError> {
    let (item, event) = state.issuer.resolve_item(ItemId(item_id)).await?;
    let (event_active, item_active) =
        state.item_flags(event.event_id, item.item_id).await?;

    Ok(Json(ItemDetailResponse {
        item: ItemResponse::from(item),
        event: EventResponse::from(event),
        event_active,
        item_active,
    }))
}
