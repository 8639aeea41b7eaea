//! # Active-Bid Guard
//!
//! A partner may hold at most one live bid per quote. Before an admin
//! records a new `BID_DESIGN` event, the assignment handler asks whether
//! the partner already has a bid on the quote that is open or accepted.

use atelier_core::{BidWithEvents, QuoteId, Timestamp, UserId};
use atelier_state::bid_state;
use chrono::Duration;

use crate::config::EngineConfig;
use crate::error::StatusError;
use crate::source::BidSource;

/// Whether any of `bids` is open or accepted as of `now`.
pub fn any_active_bid(bids: &[BidWithEvents], now: Timestamp, ttl: Duration) -> bool {
    bids.iter()
        .any(|entry| bid_state(&entry.bid, entry.event_types(), now, ttl).is_active())
}

/// Whether `user_id` holds an open or accepted bid on `quote_id`.
pub async fn has_active_bids<S>(
    source: &S,
    quote_id: QuoteId,
    user_id: UserId,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<bool, StatusError>
where
    S: BidSource + ?Sized,
{
    let bids = source
        .find_bids_with_events_for_quote_and_user(quote_id, user_id)
        .await?;
    let active = any_active_bid(&bids, now, config.bid_ttl);

    tracing::debug!(
        quote_id = %quote_id,
        user_id = %user_id,
        bids = bids.len(),
        active,
        "derived bid activity"
    );
    Ok(active)
}

/// Fail with [`StatusError::DuplicateAssignment`] if `user_id` already
/// holds an active bid on `quote_id`.
pub async fn ensure_assignable<S>(
    source: &S,
    quote_id: QuoteId,
    user_id: UserId,
    now: Timestamp,
    config: &EngineConfig,
) -> Result<(), StatusError>
where
    S: BidSource + ?Sized,
{
    if has_active_bids(source, quote_id, user_id, now, config).await? {
        tracing::warn!(
            quote_id = %quote_id,
            user_id = %user_id,
            "rejecting duplicate bid assignment"
        );
        return Err(StatusError::DuplicateAssignment { quote_id, user_id });
    }
    Ok(())
}
