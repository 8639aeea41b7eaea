//! # atelier-state: Event-Replay Lifecycle State Machines
//!
//! Derives the current lifecycle state of bids and designs by replaying
//! their ordered event logs through finite state machines. State is never
//! stored: every call recomputes it from `(entity, events, now)`.
//!
//! ## State Machines
//!
//! - **Bid** (`bid.rs`): `Initial → Open → {Accepted, Rejected, Removed}`,
//!   with `Expired` reachable from `Initial`/`Open` once the bid TTL lapses
//!   and `Accepted → Removed` when a paired partner is dropped.
//!
//! - **Design** (`design.rs`): `Initial → Submitted → Costed → CheckedOut →
//!   Paired`, with a shortcut `Initial → Costed` and a back-edge
//!   `Costed → Initial` when every cost input has lapsed before checkout.
//!
//! ## Design
//!
//! Transition tables are plain `match` expressions behind the
//! [`StateMachine`] trait. The [`replay`] fold ignores any input the table
//! has no entry for, so unrelated rows in a shared event log (comments,
//! approvals) never abort a derivation. Expiration is modelled as a
//! synthetic input injected by the engine, never as a stored event.
//!
//! Nothing here reads the clock or performs I/O; callers pass `now`.

pub mod bid;
pub mod design;
pub mod expiration;
pub mod machine;

pub use bid::{bid_state, BidInput, BidMachine, BidState};
pub use design::{
    design_state, replay_design, CostingContext, DesignInput, DesignMachine, DesignState,
};
pub use expiration::{
    earliest_expiration, has_active_cost_inputs, is_bid_expired, DEFAULT_BID_TTL_SECS,
};
pub use machine::{replay, StateMachine};
