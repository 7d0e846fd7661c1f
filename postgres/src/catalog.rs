//! PostgreSQL catalog repository.
//!
//! Query-only reads of event, item and claimant configuration. All writes
//! to these tables happen through operational tooling outside the engine.

use flashdrop_core::error::Result;
use flashdrop_core::{Claimant, ClaimantId, Event, EventId, IssueError, Item, ItemId};
use flashdrop_engine::providers::CatalogRepository;
use sqlx::PgPool;

/// PostgreSQL-backed [`CatalogRepository`].
#[derive(Clone)]
pub struct PostgresCatalog {
    /// PostgreSQL connection pool.
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct EventRow {
    event_id: i64,
    name: String,
    detail: Option<String>,
    starts_at: chrono::DateTime<chrono::Utc>,
    ends_at: chrono::DateTime<chrono::Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            event_id: EventId(row.event_id),
            name: row.name,
            detail: row.detail,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    item_id: i64,
    event_id: i64,
    name: String,
    detail: Option<String>,
    apply_starts_at: chrono::DateTime<chrono::Utc>,
    apply_ends_at: chrono::DateTime<chrono::Utc>,
    total_supply: i32,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            item_id: ItemId(row.item_id),
            event_id: EventId(row.event_id),
            name: row.name,
            detail: row.detail,
            apply_starts_at: row.apply_starts_at,
            apply_ends_at: row.apply_ends_at,
            total_supply: row.total_supply,
        }
    }
}

impl PostgresCatalog {
    /// Create a catalog over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn query_failed(what: &str, e: &sqlx::Error) -> IssueError {
        IssueError::StoreUnavailable(format!("Failed to {what}: {e}"))
    }
}

impl CatalogRepository for PostgresCatalog {
    async fn item_with_event(&self, item_id: ItemId) -> Result<(Item, Event)> {
        let row = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT item_id, event_id, name, detail,
                   apply_starts_at, apply_ends_at, total_supply
            FROM items
            WHERE item_id = $1
            ",
        )
        .bind(item_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_failed("get item", &e))?
        .ok_or(IssueError::ItemNotFound(item_id))?;

        let item = Item::from(row);
        let event = self.event(item.event_id).await?;
        Ok((item, event))
    }

    async fn event(&self, event_id: EventId) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r"
            SELECT event_id, name, detail, starts_at, ends_at
            FROM events
            WHERE event_id = $1
            ",
        )
        .bind(event_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_failed("get event", &e))?
        .ok_or(IssueError::EventNotFound(event_id))?;

        Ok(Event::from(row))
    }

    async fn events(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r"
            SELECT event_id, name, detail, starts_at, ends_at
            FROM events
            ORDER BY event_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_failed("list events", &e))?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn items_for_event(&self, event_id: EventId) -> Result<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r"
            SELECT item_id, event_id, name, detail,
                   apply_starts_at, apply_ends_at, total_supply
            FROM items
            WHERE event_id = $1
            ORDER BY item_id
            ",
        )
        .bind(event_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Self::query_failed("list items", &e))?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn claimant(&self, claimant_id: ClaimantId) -> Result<Claimant> {
        let row = sqlx::query_as::<_, (i64, String)>(
            r"
            SELECT claimant_id, login_id
            FROM claimants
            WHERE claimant_id = $1
            ",
        )
        .bind(claimant_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::query_failed("get claimant", &e))?
        .ok_or(IssueError::ClaimantNotFound(claimant_id))?;

        Ok(Claimant { claimant_id: ClaimantId(row.0), login_id: row.1 })
    }
}
