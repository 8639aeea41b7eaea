//! # Postgres Source
//!
//! Read-only SQLx queries behind [`BidSource`] and [`DesignSource`].
//!
//! ## Tables read
//!
//! - `design_events`: the append-only event log
//! - `pricing_bids`: bid rows
//! - `pricing_cost_inputs`: cost inputs, soft-deleted via `deleted_at`
//! - `collection_designs`: design membership in collections
//!
//! Every event query orders by `created_at ASC`; the replay engine relies
//! on that ordering. Event tags are decoded through `EventType::from_str`,
//! so a row with an unknown tag fails the whole fetch with
//! [`SourceError::Decode`](crate::SourceError::Decode) instead of being
//! replayed as a silent no-op.
//!
//! Writes belong to the services that own these tables, not to this crate.

pub mod bids;
pub mod designs;
pub mod events;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use atelier_core::{
    BidId, BidWithEvents, CollectionId, DesignId, DesignWithMeta, DomainEvent, QuoteId, UserId,
};

use crate::error::SourceError;
use crate::source::{BidSource, DesignSource, SourceResult};

/// A [`BidSource`] and [`DesignSource`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgSource {
    pool: PgPool,
}

impl PgSource {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `url` with a small read pool.
    pub async fn connect(url: &str) -> Result<Self, SourceError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(url)
            .await?;
        tracing::info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Connect using `DATABASE_URL`.
    ///
    /// Returns [`SourceError::Unavailable`] if the variable is not set.
    pub async fn from_env() -> Result<Self, SourceError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| SourceError::Unavailable("DATABASE_URL is not set".to_string()))?;
        Self::connect(&url).await
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BidSource for PgSource {
    async fn find_events_for_bid(&self, bid_id: BidId) -> SourceResult<Vec<DomainEvent>> {
        events::find_by_bid(&self.pool, bid_id).await
    }

    async fn find_bids_with_events_for_quote_and_user(
        &self,
        quote_id: QuoteId,
        user_id: UserId,
    ) -> SourceResult<Vec<BidWithEvents>> {
        let bids = bids::find_by_quote(&self.pool, quote_id).await?;
        let bid_ids: Vec<BidId> = bids.iter().map(|b| b.id).collect();
        let events = events::find_by_bids_and_user(&self.pool, &bid_ids, user_id).await?;
        Ok(bids::attach_events(bids, events))
    }
}

#[async_trait]
impl DesignSource for PgSource {
    async fn find_events_for_design(&self, design_id: DesignId) -> SourceResult<Vec<DomainEvent>> {
        events::find_by_design(&self.pool, design_id).await
    }

    async fn find_designs_with_costs_and_events_by_collection_ids(
        &self,
        collection_ids: &[CollectionId],
    ) -> SourceResult<Vec<DesignWithMeta>> {
        let members = designs::find_members(&self.pool, collection_ids).await?;
        if members.is_empty() {
            return Ok(Vec::new());
        }
        let design_ids: Vec<DesignId> = members.iter().map(|(id, _)| *id).collect();
        let cost_inputs = designs::find_cost_inputs(&self.pool, &design_ids).await?;
        let events = events::find_by_designs(&self.pool, &design_ids).await?;

        tracing::debug!(
            designs = members.len(),
            cost_inputs = cost_inputs.len(),
            events = events.len(),
            "fetched collection designs"
        );
        Ok(designs::assemble(members, cost_inputs, events))
    }
}
