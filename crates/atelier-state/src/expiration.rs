//! # Expiration Predicates
//!
//! Pure time checks that feed the synthetic expiration inputs of the bid
//! and design machines, plus the earliest-expiration selector used by the
//! collection roll-up. Every function takes `now` explicitly.

use chrono::Duration;

use atelier_core::{Bid, CostInput, Timestamp};

/// Default bid time-to-live: a partner has 24 hours to answer a bid.
pub const DEFAULT_BID_TTL_SECS: i64 = 24 * 60 * 60;

/// Whether `bid` has outlived `ttl` as of `now`.
///
/// The bid expires strictly after `created_at + ttl`; at exactly the
/// deadline it is still live.
pub fn is_bid_expired(bid: &Bid, now: Timestamp, ttl: Duration) -> bool {
    bid.created_at.shifted(ttl) < now
}

/// Whether any cost input is still valid at `now`.
///
/// A cost input with no expiration never lapses.
pub fn has_active_cost_inputs(cost_inputs: &[CostInput], now: Timestamp) -> bool {
    cost_inputs.iter().any(|input| input.is_active_at(now))
}

/// The earliest future expiration among `cost_inputs`, or `None`.
///
/// Already-expired inputs are ignored, and never-expiring inputs do not
/// compete for the minimum.
pub fn earliest_expiration(cost_inputs: &[CostInput], now: Timestamp) -> Option<Timestamp> {
    cost_inputs
        .iter()
        .filter(|input| input.is_active_at(now))
        .filter_map(|input| input.expires_at)
        .min()
}
