//! Bid queries over the `pricing_bids` table.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::{Bid, BidId, BidWithEvents, DomainEvent, QuoteId, Timestamp};

use crate::source::SourceResult;

/// Fetch the live bids on `quote_id`, oldest first.
pub async fn find_by_quote(pool: &PgPool, quote_id: QuoteId) -> SourceResult<Vec<Bid>> {
    let rows = sqlx::query_as::<_, BidRow>(
        "SELECT id, created_at, quote_id, bid_price_cents, project_due_in_ms, description
         FROM pricing_bids
         WHERE quote_id = $1 AND deleted_at IS NULL
         ORDER BY created_at ASC",
    )
    .bind(quote_id.0)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(BidRow::into_bid).collect())
}

/// Pair each bid with its events, dropping bids that have none.
pub fn attach_events(bids: Vec<Bid>, events: Vec<DomainEvent>) -> Vec<BidWithEvents> {
    let mut by_bid: HashMap<BidId, Vec<DomainEvent>> = HashMap::new();
    for event in events {
        if let Some(bid_id) = event.bid_id {
            by_bid.entry(bid_id).or_default().push(event);
        }
    }

    bids.into_iter()
        .filter_map(|bid| {
            let events = by_bid.remove(&bid.id)?;
            Some(BidWithEvents { bid, events })
        })
        .collect()
}

/// Row type for the `pricing_bids` table.
#[derive(Debug, sqlx::FromRow)]
struct BidRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    quote_id: Uuid,
    bid_price_cents: i64,
    project_due_in_ms: Option<i64>,
    description: Option<String>,
}

impl BidRow {
    fn into_bid(self) -> Bid {
        Bid {
            id: self.id.into(),
            created_at: Timestamp::from_utc(self.created_at),
            quote_id: self.quote_id.into(),
            bid_price_cents: self.bid_price_cents,
            project_due_in_ms: self.project_due_in_ms,
            description: self.description,
        }
    }
}
