//! # Bid Lifecycle State Machine
//!
//! Derives a production bid's state from its event log.
//!
//! ## States
//!
//! ```text
//! Initial ──BID_DESIGN──▶ Open ──ACCEPT_SERVICE_BID──▶ Accepted ──REMOVE_PARTNER──▶ Removed
//!    │                     │ │                                                      (terminal)
//!    │                     │ └──REJECT_SERVICE_BID──▶ Rejected (terminal)
//!    │                     └────REMOVE_PARTNER──────▶ Removed  (terminal)
//!    └──────(expire)───────┴────────────────────────▶ Expired  (terminal)
//! ```
//!
//! Expiration is not a stored event. Once the recorded events are folded,
//! a single synthetic `Expire` input is applied if the bid has outlived its
//! TTL; an accepted, rejected or removed bid ignores it.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use atelier_core::{Bid, EventType, Timestamp};

use crate::expiration::is_bid_expired;
use crate::machine::{replay, StateMachine};

/// The lifecycle state of a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidState {
    /// Created, not yet assigned to a partner.
    Initial,
    /// Assigned to a partner, awaiting an answer.
    Open,
    /// The partner accepted.
    Accepted,
    /// The partner rejected (terminal).
    Rejected,
    /// The partner was removed (terminal).
    Removed,
    /// Nobody answered before the TTL lapsed (terminal).
    Expired,
}

impl BidState {
    /// Returns the canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Open => "OPEN",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Removed => "REMOVED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Removed | Self::Expired)
    }

    /// Whether the bid still holds the assignment (open or accepted).
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Accepted)
    }
}

impl std::fmt::Display for BidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An input to the bid machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidInput {
    /// A recorded event from the log.
    Event(EventType),
    /// The synthetic TTL expiration.
    Expire,
}

impl From<EventType> for BidInput {
    fn from(event_type: EventType) -> Self {
        Self::Event(event_type)
    }
}

/// The bid transition table.
pub struct BidMachine;

impl StateMachine for BidMachine {
    type State = BidState;
    type Input = BidInput;

    const INITIAL: BidState = BidState::Initial;

    fn transition(state: BidState, input: BidInput) -> Option<BidState> {
        use BidInput::{Event, Expire};

        match (state, input) {
            (BidState::Initial, Event(EventType::BidDesign)) => Some(BidState::Open),
            (BidState::Initial | BidState::Open, Expire) => Some(BidState::Expired),
            (BidState::Open, Event(EventType::AcceptServiceBid)) => Some(BidState::Accepted),
            (BidState::Open, Event(EventType::RejectServiceBid)) => Some(BidState::Rejected),
            (BidState::Open | BidState::Accepted, Event(EventType::RemovePartner)) => {
                Some(BidState::Removed)
            }
            _ => None,
        }
    }
}

/// Derive the current state of `bid` from its ordered event tags.
///
/// `events` must be in creation-time order. Tags the bid machine does not
/// react to are ignored.
pub fn bid_state<I>(bid: &Bid, events: I, now: Timestamp, ttl: Duration) -> BidState
where
    I: IntoIterator<Item = EventType>,
{
    let inputs = events.into_iter().map(BidInput::from);
    let recorded = replay::<BidMachine, _>(BidMachine::INITIAL, inputs);
    if is_bid_expired(bid, now, ttl) {
        BidMachine::step(recorded, BidInput::Expire)
    } else {
        recorded
    }
}
