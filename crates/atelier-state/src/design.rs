//! # Design Lifecycle State Machine
//!
//! Derives a design's state from its event log and its cost inputs.
//!
//! ## States
//!
//! ```text
//! Initial ──SUBMIT_DESIGN──▶ Submitted ──COMMIT_COST_INPUTS──▶ Costed ──COMMIT_QUOTE──▶ CheckedOut
//!    │  ▲                                                       ▲  │                        │
//!    │  └─────────────────(expire cost input)────────────────────┼──┘              COMMIT_PARTNER_PAIRING
//!    └──────────────────────COMMIT_COST_INPUTS───────────────────┘                          ▼
//!                                                                                    Paired (terminal)
//! ```
//!
//! ## Cost-input expiration
//!
//! Pricing goes stale. Whenever a recorded event leaves the machine in
//! `Costed`, the fold checks the design's [`CostingContext`]: if no cost
//! input is active at `now` and no quote was ever committed, the synthetic
//! `ExpireCostInput` input sends the design back to `Initial`. The check
//! runs after every step rather than once at the end, so a design that was
//! costed, lapsed, and was re-costed still settles on the state its
//! *current* pricing supports.

use serde::{Deserialize, Serialize};

use atelier_core::{CostInput, DesignWithMeta, EventType, Timestamp};

use crate::expiration::has_active_cost_inputs;
use crate::machine::StateMachine;

/// The lifecycle state of a design.
///
/// Variants are declared in milestone order; see [`DesignState::milestone()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DesignState {
    /// Drafting, or pricing lapsed before checkout.
    Initial,
    /// Submitted for costing.
    Submitted,
    /// Priced by an admin.
    Costed,
    /// The designer checked out; a quote exists.
    CheckedOut,
    /// A production partner is paired (terminal).
    Paired,
}

impl DesignState {
    /// Returns the canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Submitted => "SUBMITTED",
            Self::Costed => "COSTED",
            Self::CheckedOut => "CHECKED_OUT",
            Self::Paired => "PAIRED",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paired)
    }

    /// Position on the happy path, `0` (`Initial`) through `4` (`Paired`).
    pub fn milestone(&self) -> u8 {
        match self {
            Self::Initial => 0,
            Self::Submitted => 1,
            Self::Costed => 2,
            Self::CheckedOut => 3,
            Self::Paired => 4,
        }
    }

    /// Whether this state is `milestone` or further along the happy path.
    pub fn has_reached(&self, milestone: DesignState) -> bool {
        self.milestone() >= milestone.milestone()
    }
}

impl std::fmt::Display for DesignState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An input to the design machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignInput {
    /// A recorded event from the log.
    Event(EventType),
    /// The synthetic cost-input expiration.
    ExpireCostInput,
}

impl From<EventType> for DesignInput {
    fn from(event_type: EventType) -> Self {
        Self::Event(event_type)
    }
}

/// The design transition table.
pub struct DesignMachine;

impl StateMachine for DesignMachine {
    type State = DesignState;
    type Input = DesignInput;

    const INITIAL: DesignState = DesignState::Initial;

    fn transition(state: DesignState, input: DesignInput) -> Option<DesignState> {
        use DesignInput::{Event, ExpireCostInput};

        match (state, input) {
            (DesignState::Initial, Event(EventType::SubmitDesign)) => Some(DesignState::Submitted),
            (DesignState::Initial | DesignState::Submitted, Event(EventType::CommitCostInputs)) => {
                Some(DesignState::Costed)
            }
            (DesignState::Costed, Event(EventType::CommitQuote)) => Some(DesignState::CheckedOut),
            (DesignState::Costed, ExpireCostInput) => Some(DesignState::Initial),
            (DesignState::CheckedOut, Event(EventType::CommitPartnerPairing)) => {
                Some(DesignState::Paired)
            }
            _ => None,
        }
    }
}

/// Facts about a design's pricing, computed once before the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostingContext {
    /// At least one cost input is valid at `now`.
    pub has_active_cost_inputs: bool,
    /// A `COMMIT_QUOTE` appears anywhere in the log.
    pub has_committed_quote: bool,
}

impl CostingContext {
    /// Build the context for a design's cost inputs and event tags.
    pub fn new<I>(cost_inputs: &[CostInput], events: I, now: Timestamp) -> Self
    where
        I: IntoIterator<Item = EventType>,
    {
        Self {
            has_active_cost_inputs: has_active_cost_inputs(cost_inputs, now),
            has_committed_quote: events.into_iter().any(|t| t == EventType::CommitQuote),
        }
    }

    /// Whether a `Costed` design should fall back to `Initial`.
    pub fn pricing_lapsed(&self) -> bool {
        !self.has_active_cost_inputs && !self.has_committed_quote
    }

    /// Apply the expiration overlay to the state reached after a step.
    pub fn settle(&self, state: DesignState) -> DesignState {
        if state == DesignState::Costed && self.pricing_lapsed() {
            DesignMachine::step(state, DesignInput::ExpireCostInput)
        } else {
            state
        }
    }
}

/// Replay `events` with the cost-input expiration overlay applied after
/// every step.
///
/// `events` must be in creation-time order.
pub fn replay_design(events: &[EventType], context: &CostingContext) -> DesignState {
    events.iter().fold(DesignMachine::INITIAL, |state, event_type| {
        context.settle(DesignMachine::step(state, DesignInput::from(*event_type)))
    })
}

/// Derive the current state of `design` as of `now`.
pub fn design_state(design: &DesignWithMeta, now: Timestamp) -> DesignState {
    let events: Vec<EventType> = design.event_types().collect();
    let context = CostingContext::new(&design.cost_inputs, events.iter().copied(), now);
    replay_design(&events, &context)
}
