//! # Entity Shapes
//!
//! The rows the persistence layer materializes for the engine. None of
//! them carries a lifecycle state: state is always recomputed from the
//! event log, never stored.

use serde::{Deserialize, Serialize};

use crate::event::{DomainEvent, EventType};
use crate::identity::{BidId, CollectionId, CostInputId, DesignId, QuoteId};
use crate::temporal::Timestamp;

/// A production bid offered to a partner for a quote.
///
/// Price fields are carried through untouched; the engine only reads
/// `created_at` (for the TTL) and the bid's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Bid identifier.
    pub id: BidId,
    /// When the bid was created; the TTL runs from here.
    pub created_at: Timestamp,
    /// The quote this bid prices.
    pub quote_id: QuoteId,
    /// Offered price in cents.
    pub bid_price_cents: i64,
    /// Requested turnaround, in milliseconds.
    pub project_due_in_ms: Option<i64>,
    /// Free-form description shown to the partner.
    pub description: Option<String>,
}

/// A cost input committed for a design.
///
/// A design accumulates cost inputs as it is re-costed; only those that
/// have not yet expired count as active pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInput {
    /// Cost input identifier.
    pub id: CostInputId,
    /// The design this cost input prices.
    pub design_id: DesignId,
    /// When the pricing stops being valid. `None` never expires.
    pub expires_at: Option<Timestamp>,
}

impl CostInput {
    /// Whether this cost input is still valid at `now`.
    ///
    /// A cost input expiring exactly at `now` is already expired.
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at > now,
        }
    }
}

/// A design bundled with everything its lifecycle depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignWithMeta {
    /// Design identifier.
    pub id: DesignId,
    /// The collection the design belongs to.
    pub collection_id: CollectionId,
    /// Every cost input ever committed for the design.
    pub cost_inputs: Vec<CostInput>,
    /// The design's event log, ordered by creation time.
    pub events: Vec<DomainEvent>,
}

impl DesignWithMeta {
    /// The event tags of this design's log, in order.
    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.events.iter().map(|e| e.event_type)
    }
}

/// A bid bundled with its (filtered) event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidWithEvents {
    /// The bid row.
    #[serde(flatten)]
    pub bid: Bid,
    /// The bid's events, ordered by creation time.
    pub events: Vec<DomainEvent>,
}

impl BidWithEvents {
    /// The event tags of this bid's log, in order.
    pub fn event_types(&self) -> impl Iterator<Item = EventType> + '_ {
        self.events.iter().map(|e| e.event_type)
    }
}
