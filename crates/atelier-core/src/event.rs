//! # Domain Events
//!
//! Immutable records of things that happened to a bid or a design. Events
//! are written by the persistence layer and only ever read here, in
//! creation-time order.
//!
//! `EventType` is the closed vocabulary of event tags. It intentionally
//! includes tags that neither lifecycle machine reacts to (comments,
//! approvals, revision requests): those rows share the design's event log
//! and must replay as no-ops rather than fail ingestion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AtelierError;
use crate::identity::{BidId, DesignId, EventId, QuoteId, UserId};
use crate::temporal::Timestamp;

/// Every event tag the design event log can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// An admin requested bids from partners for a design.
    RequestServiceBid,
    /// A partner was assigned a bid on a design.
    BidDesign,
    /// The partner accepted the bid.
    AcceptServiceBid,
    /// The partner rejected the bid.
    RejectServiceBid,
    /// An admin removed the partner from the design.
    RemovePartner,
    /// The designer submitted the design for costing.
    SubmitDesign,
    /// An admin committed cost inputs for the design.
    CommitCostInputs,
    /// The designer checked out and a quote was committed.
    CommitQuote,
    /// A production partner was paired with the design.
    CommitPartnerPairing,
    /// A comment was left on the design.
    CommentCreate,
    /// An admin approved the design artwork.
    ApproveDesign,
    /// A revision was requested on the design.
    RevisionRequest,
}

impl EventType {
    /// Returns all event types in declaration order.
    pub fn all() -> &'static [EventType] {
        &[
            Self::RequestServiceBid,
            Self::BidDesign,
            Self::AcceptServiceBid,
            Self::RejectServiceBid,
            Self::RemovePartner,
            Self::SubmitDesign,
            Self::CommitCostInputs,
            Self::CommitQuote,
            Self::CommitPartnerPairing,
            Self::CommentCreate,
            Self::ApproveDesign,
            Self::RevisionRequest,
        ]
    }

    /// The tag as stored in the event log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestServiceBid => "REQUEST_SERVICE_BID",
            Self::BidDesign => "BID_DESIGN",
            Self::AcceptServiceBid => "ACCEPT_SERVICE_BID",
            Self::RejectServiceBid => "REJECT_SERVICE_BID",
            Self::RemovePartner => "REMOVE_PARTNER",
            Self::SubmitDesign => "SUBMIT_DESIGN",
            Self::CommitCostInputs => "COMMIT_COST_INPUTS",
            Self::CommitQuote => "COMMIT_QUOTE",
            Self::CommitPartnerPairing => "COMMIT_PARTNER_PAIRING",
            Self::CommentCreate => "COMMENT_CREATE",
            Self::ApproveDesign => "APPROVE_DESIGN",
            Self::RevisionRequest => "REVISION_REQUEST",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = AtelierError;

    /// Parse an event tag as stored in the event log.
    ///
    /// Accepts the same tags produced by [`EventType::as_str()`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AtelierError::UnknownEventType(s.to_string()))
    }
}

/// An immutable entry in a design's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    /// Row identifier.
    pub id: EventId,
    /// When the event was recorded. The log is ordered by this field.
    pub created_at: Timestamp,
    /// The user who caused the event.
    pub actor_id: UserId,
    /// The user the event is about (e.g. the partner for `BID_DESIGN`).
    pub target_id: Option<UserId>,
    /// The event tag.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The design the event belongs to.
    pub design_id: DesignId,
    /// The bid the event belongs to, for bid lifecycle events.
    pub bid_id: Option<BidId>,
    /// The quote the event belongs to, if any.
    pub quote_id: Option<QuoteId>,
}

impl DomainEvent {
    /// Whether `user` is the actor or the target of this event.
    pub fn involves(&self, user: UserId) -> bool {
        self.actor_id == user || self.target_id == Some(user)
    }
}
