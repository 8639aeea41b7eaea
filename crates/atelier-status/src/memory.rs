//! In-memory [`BidSource`] and [`DesignSource`].
//!
//! Holds rows in `parking_lot` locks and answers the same queries the
//! Postgres source does, including ordering events by creation time.
//! Intended for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use atelier_core::{
    Bid, BidId, BidWithEvents, CollectionId, CostInput, DesignId, DesignWithMeta, DomainEvent,
    QuoteId, UserId,
};

use crate::source::{BidSource, DesignSource, SourceResult};

/// In-memory row store.
#[derive(Debug, Default)]
pub struct MemorySource {
    designs: RwLock<HashMap<DesignId, CollectionId>>,
    cost_inputs: RwLock<Vec<CostInput>>,
    bids: RwLock<HashMap<BidId, Bid>>,
    events: RwLock<Vec<DomainEvent>>,
}

impl MemorySource {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a design as a member of `collection_id`.
    pub fn insert_design(&self, design_id: DesignId, collection_id: CollectionId) {
        self.designs.write().insert(design_id, collection_id);
    }

    /// Register a design together with its cost inputs and events.
    pub fn insert_design_with_meta(&self, design: DesignWithMeta) {
        self.insert_design(design.id, design.collection_id);
        self.cost_inputs.write().extend(design.cost_inputs);
        self.events.write().extend(design.events);
    }

    /// Add a cost input. Its design need not be registered yet.
    pub fn insert_cost_input(&self, cost_input: CostInput) {
        self.cost_inputs.write().push(cost_input);
    }

    /// Insert a bid, replacing any bid with the same id.
    pub fn insert_bid(&self, bid: Bid) {
        self.bids.write().insert(bid.id, bid);
    }

    /// Append an event to the log. Reads return events ordered by
    /// `created_at`, whatever the append order.
    pub fn append_event(&self, event: DomainEvent) {
        self.events.write().push(event);
    }

    fn events_where<P>(&self, predicate: P) -> Vec<DomainEvent>
    where
        P: Fn(&DomainEvent) -> bool,
    {
        let mut events: Vec<DomainEvent> = self
            .events
            .read()
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        events
    }
}

#[async_trait]
impl BidSource for MemorySource {
    async fn find_events_for_bid(&self, bid_id: BidId) -> SourceResult<Vec<DomainEvent>> {
        Ok(self.events_where(|e| e.bid_id == Some(bid_id)))
    }

    async fn find_bids_with_events_for_quote_and_user(
        &self,
        quote_id: QuoteId,
        user_id: UserId,
    ) -> SourceResult<Vec<BidWithEvents>> {
        let mut bids: Vec<Bid> = self
            .bids
            .read()
            .values()
            .filter(|bid| bid.quote_id == quote_id)
            .cloned()
            .collect();
        bids.sort_by_key(|bid| bid.created_at);

        Ok(bids
            .into_iter()
            .filter_map(|bid| {
                let events =
                    self.events_where(|e| e.bid_id == Some(bid.id) && e.involves(user_id));
                (!events.is_empty()).then_some(BidWithEvents { bid, events })
            })
            .collect())
    }
}

#[async_trait]
impl DesignSource for MemorySource {
    async fn find_events_for_design(&self, design_id: DesignId) -> SourceResult<Vec<DomainEvent>> {
        Ok(self.events_where(|e| e.design_id == design_id))
    }

    async fn find_designs_with_costs_and_events_by_collection_ids(
        &self,
        collection_ids: &[CollectionId],
    ) -> SourceResult<Vec<DesignWithMeta>> {
        let mut members: Vec<(DesignId, CollectionId)> = self
            .designs
            .read()
            .iter()
            .filter(|(_, collection_id)| collection_ids.contains(collection_id))
            .map(|(design_id, collection_id)| (*design_id, *collection_id))
            .collect();
        members.sort();

        let cost_inputs = self.cost_inputs.read();
        Ok(members
            .into_iter()
            .map(|(id, collection_id)| DesignWithMeta {
                id,
                collection_id,
                cost_inputs: cost_inputs
                    .iter()
                    .filter(|c| c.design_id == id)
                    .cloned()
                    .collect(),
                events: self.events_where(|e| e.design_id == id),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{CostInputId, EventId, EventType, Timestamp};
    use chrono::Duration;

    fn event(design_id: DesignId, event_type: EventType, at: Timestamp) -> DomainEvent {
        DomainEvent {
            id: EventId::new(),
            created_at: at,
            actor_id: UserId::new(),
            target_id: None,
            event_type,
            design_id,
            bid_id: None,
            quote_id: None,
        }
    }

    #[tokio::test]
    async fn events_come_back_in_creation_order() {
        let source = MemorySource::new();
        let design_id = DesignId::new();
        let t0 = Timestamp::now();
        let later = t0.shifted(Duration::minutes(5));
        source.append_event(event(design_id, EventType::CommitCostInputs, later));
        source.append_event(event(design_id, EventType::SubmitDesign, t0));

        let events = source.find_events_for_design(design_id).await.unwrap();
        let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::SubmitDesign, EventType::CommitCostInputs]);
    }

    #[tokio::test]
    async fn bid_events_are_scoped_to_the_bid_and_ordered() {
        let source = MemorySource::new();
        let design_id = DesignId::new();
        let bid_id = BidId::new();
        let other_bid = BidId::new();
        let t0 = Timestamp::now();

        let on_bid = |bid_id: BidId, event_type: EventType, at: Timestamp| DomainEvent {
            bid_id: Some(bid_id),
            ..event(design_id, event_type, at)
        };
        let t1 = t0.shifted(Duration::minutes(1));
        let t2 = t0.shifted(Duration::minutes(2));
        source.append_event(on_bid(bid_id, EventType::AcceptServiceBid, t2));
        source.append_event(on_bid(other_bid, EventType::BidDesign, t1));
        source.append_event(on_bid(bid_id, EventType::BidDesign, t0));
        source.append_event(event(design_id, EventType::SubmitDesign, t0));

        let events = source.find_events_for_bid(bid_id).await.unwrap();
        let types: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec![EventType::BidDesign, EventType::AcceptServiceBid]);
        assert!(events.iter().all(|e| e.bid_id == Some(bid_id)));

        assert!(source.find_events_for_bid(BidId::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn designs_are_filtered_by_collection() {
        let source = MemorySource::new();
        let wanted = CollectionId::new();
        let other = CollectionId::new();
        let design_a = DesignId::new();
        let design_b = DesignId::new();
        source.insert_design(design_a, wanted);
        source.insert_design(design_b, other);
        source.insert_cost_input(CostInput {
            id: CostInputId::new(),
            design_id: design_a,
            expires_at: None,
        });

        let designs = source
            .find_designs_with_costs_and_events_by_collection_ids(&[wanted])
            .await
            .unwrap();
        assert_eq!(designs.len(), 1);
        assert_eq!(designs[0].id, design_a);
        assert_eq!(designs[0].cost_inputs.len(), 1);
    }
}
