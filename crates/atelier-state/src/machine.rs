//! # Replay Engine
//!
//! A [`StateMachine`] is a partial transition table over `(State, Input)`.
//! [`replay`] folds an ordered input sequence through it. Inputs without a
//! table entry leave the state unchanged; terminal states are terminal only
//! because the table defines no outgoing edges for them.

use std::fmt::Debug;

/// A finite state machine defined by a partial transition table.
pub trait StateMachine {
    /// The lifecycle states.
    type State: Copy + Eq + Debug;
    /// The inputs the table is keyed by (recorded events and synthetic ones).
    type Input: Copy + Debug;

    /// The state every replay starts from.
    const INITIAL: Self::State;

    /// The transition table. `None` means the input does not apply in `state`.
    fn transition(state: Self::State, input: Self::Input) -> Option<Self::State>;

    /// One fold step: follow the table, or stay put when there is no entry.
    fn step(state: Self::State, input: Self::Input) -> Self::State {
        Self::transition(state, input).unwrap_or(state)
    }

    /// Whether `state` has no outgoing edges for any of `inputs`.
    fn accepts_none(state: Self::State, inputs: &[Self::Input]) -> bool {
        inputs
            .iter()
            .all(|input| Self::transition(state, *input).is_none())
    }
}

/// Fold `inputs` through `M`'s transition table starting at `initial`.
pub fn replay<M, I>(initial: M::State, inputs: I) -> M::State
where
    M: StateMachine,
    I: IntoIterator<Item = M::Input>,
{
    inputs.into_iter().fold(initial, M::step)
}
