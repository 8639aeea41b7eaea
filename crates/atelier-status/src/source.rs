//! # Data Sources
//!
//! The read side of the persistence layer, as the status services see it.
//! Each method returns fully materialized rows; events are always in
//! creation-time order, which the replay engine relies on but does not
//! check.
//!
//! Implementations: [`MemorySource`](crate::MemorySource) and
//! [`PgSource`](crate::db::PgSource).

use async_trait::async_trait;

use atelier_core::{
    BidId, BidWithEvents, CollectionId, DesignId, DesignWithMeta, DomainEvent, QuoteId, UserId,
};

use crate::error::SourceError;

/// Result type for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Read access to bids and their events.
#[async_trait]
pub trait BidSource: Send + Sync {
    /// All events recorded against `bid_id`, oldest first.
    async fn find_events_for_bid(&self, bid_id: BidId) -> SourceResult<Vec<DomainEvent>>;

    /// Bids on `quote_id` that have at least one event whose actor or
    /// target is `user_id`, each paired with those events, oldest first.
    async fn find_bids_with_events_for_quote_and_user(
        &self,
        quote_id: QuoteId,
        user_id: UserId,
    ) -> SourceResult<Vec<BidWithEvents>>;
}

/// Read access to designs, their cost inputs and their events.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// All events recorded against `design_id`, oldest first.
    async fn find_events_for_design(&self, design_id: DesignId) -> SourceResult<Vec<DomainEvent>>;

    /// Every design in any of `collection_ids`, each with its cost inputs
    /// and its event log.
    async fn find_designs_with_costs_and_events_by_collection_ids(
        &self,
        collection_ids: &[CollectionId],
    ) -> SourceResult<Vec<DesignWithMeta>>;
}
