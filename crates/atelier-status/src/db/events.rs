//! Event log queries over the `design_events` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::{AtelierError, BidId, DesignId, DomainEvent, EventType, Timestamp, UserId};

use crate::source::SourceResult;

const EVENT_COLUMNS: &str =
    "id, created_at, actor_id, target_id, type, design_id, bid_id, quote_id";

/// Fetch the event log of one design.
pub async fn find_by_design(pool: &PgPool, design_id: DesignId) -> SourceResult<Vec<DomainEvent>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM design_events
         WHERE design_id = $1
         ORDER BY created_at ASC"
    ))
    .bind(design_id.0)
    .fetch_all(pool)
    .await?;

    decode_all(rows)
}

/// Fetch the event logs of many designs, interleaved, oldest first.
pub async fn find_by_designs(
    pool: &PgPool,
    design_ids: &[DesignId],
) -> SourceResult<Vec<DomainEvent>> {
    let ids: Vec<Uuid> = design_ids.iter().map(|id| id.0).collect();
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM design_events
         WHERE design_id = ANY($1)
         ORDER BY created_at ASC"
    ))
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    decode_all(rows)
}

/// Fetch the events recorded against one bid.
pub async fn find_by_bid(pool: &PgPool, bid_id: BidId) -> SourceResult<Vec<DomainEvent>> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM design_events
         WHERE bid_id = $1
         ORDER BY created_at ASC"
    ))
    .bind(bid_id.0)
    .fetch_all(pool)
    .await?;

    decode_all(rows)
}

/// Fetch the events on any of `bid_ids` in which `user_id` is the actor or
/// the target.
pub async fn find_by_bids_and_user(
    pool: &PgPool,
    bid_ids: &[BidId],
    user_id: UserId,
) -> SourceResult<Vec<DomainEvent>> {
    if bid_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = bid_ids.iter().map(|id| id.0).collect();
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM design_events
         WHERE bid_id = ANY($1)
           AND (actor_id = $2 OR target_id = $2)
         ORDER BY created_at ASC"
    ))
    .bind(&ids)
    .bind(user_id.0)
    .fetch_all(pool)
    .await?;

    decode_all(rows)
}

fn decode_all(rows: Vec<EventRow>) -> SourceResult<Vec<DomainEvent>> {
    rows.into_iter()
        .map(|row| row.into_event().map_err(Into::into))
        .collect()
}

/// Row type for the `design_events` table.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EventRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    actor_id: Uuid,
    target_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    event_type: String,
    design_id: Uuid,
    bid_id: Option<Uuid>,
    quote_id: Option<Uuid>,
}

impl EventRow {
    fn into_event(self) -> Result<DomainEvent, AtelierError> {
        let event_type: EventType = self.event_type.parse()?;
        Ok(DomainEvent {
            id: self.id.into(),
            created_at: Timestamp::from_utc(self.created_at),
            actor_id: self.actor_id.into(),
            target_id: self.target_id.map(Into::into),
            event_type,
            design_id: self.design_id.into(),
            bid_id: self.bid_id.map(Into::into),
            quote_id: self.quote_id.map(Into::into),
        })
    }
}
