//! # Collection Labels and Pricing Reminders
//!
//! Classifiers over [`SubmissionStatus`] for the jobs downstream of the
//! roll-up: the labeling job tags collections by the furthest milestone
//! they have reached, and the pricing scheduler decides which owners to
//! remind that their quote pricing is about to lapse (one week out, two
//! days out) or has just lapsed.
//!
//! Delivery is somebody else's problem; this module only decides.

use std::collections::HashMap;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use atelier_core::{CollectionId, CostInput, DesignWithMeta, Timestamp};
use atelier_state::has_active_cost_inputs;

use crate::config::EngineConfig;
use crate::error::StatusError;
use crate::source::DesignSource;
use crate::submission::{summarize_collections, SubmissionStatus};

/// The furthest milestone a collection has reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionLabel {
    /// Empty, or not every design is submitted.
    Draft,
    /// Submitted, waiting on an admin to cost it.
    NeedsCosting,
    /// Priced, waiting on checkout.
    Costed,
    /// Checked out, waiting on partner pairing.
    Quoted,
    /// Every design is paired.
    Paired,
}

impl CollectionLabel {
    /// Label a collection by its highest milestone.
    pub fn from_status(status: &SubmissionStatus) -> Self {
        if status.is_paired {
            Self::Paired
        } else if status.is_quoted {
            Self::Quoted
        } else if status.is_costed {
            Self::Costed
        } else if status.is_submitted {
            Self::NeedsCosting
        } else {
            Self::Draft
        }
    }
}

/// Lead times before pricing expiry at which owners are reminded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderWindows {
    /// The early reminder.
    pub one_week: Duration,
    /// The final reminder.
    pub two_days: Duration,
}

/// Which pricing notice, if any, a collection owner should get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingReminder {
    /// Pricing lapses within the one-week window.
    OneWeek,
    /// Pricing lapses within the two-day window.
    TwoDays,
    /// All pricing lapsed within the look-back window.
    JustExpired,
}

impl PricingReminder {
    /// The ahead-of-time reminder for a collection, if it is due.
    ///
    /// Only costed collections that have not been checked out get reminders:
    /// once quoted, the price is locked in.
    pub fn for_status(
        status: &SubmissionStatus,
        now: Timestamp,
        windows: &ReminderWindows,
    ) -> Option<Self> {
        if !status.is_costed || status.is_quoted {
            return None;
        }
        let remaining = status.pricing_expires_at?.since(now);
        if remaining <= Duration::zero() {
            None
        } else if remaining <= windows.two_days {
            Some(Self::TwoDays)
        } else if remaining <= windows.one_week {
            Some(Self::OneWeek)
        } else {
            None
        }
    }
}

/// Whether pricing has *just* lapsed: nothing is active any more and at
/// least one cost input expired within `(now - lookback, now]`.
pub fn pricing_just_expired(cost_inputs: &[CostInput], now: Timestamp, lookback: Duration) -> bool {
    if has_active_cost_inputs(cost_inputs, now) {
        return false;
    }
    let horizon = now.shifted(-lookback);
    cost_inputs
        .iter()
        .filter_map(|c| c.expires_at)
        .any(|expires_at| expires_at > horizon && expires_at <= now)
}

/// The reminder due for each of `collection_ids` as of `now`.
///
/// Collections that need no reminder are left out. Quoted collections are
/// never reminded, even when their original pricing has since lapsed.
pub async fn pricing_reminders<S>(
    source: &S,
    collection_ids: &[CollectionId],
    now: Timestamp,
    config: &EngineConfig,
) -> Result<HashMap<CollectionId, PricingReminder>, StatusError>
where
    S: DesignSource + ?Sized,
{
    let designs = source
        .find_designs_with_costs_and_events_by_collection_ids(collection_ids)
        .await?;
    let statuses = summarize_collections(collection_ids, &designs, now);

    let mut cost_inputs: HashMap<CollectionId, Vec<CostInput>> = HashMap::new();
    for DesignWithMeta { collection_id, cost_inputs: inputs, .. } in &designs {
        cost_inputs
            .entry(*collection_id)
            .or_default()
            .extend(inputs.iter().cloned());
    }

    let reminders: HashMap<CollectionId, PricingReminder> = statuses
        .iter()
        .filter_map(|(collection_id, status)| {
            let due = PricingReminder::for_status(status, now, &config.reminders);
            let reminder = due.or_else(|| {
                let inputs = cost_inputs.get(collection_id)?;
                (!status.is_quoted && pricing_just_expired(inputs, now, config.expired_lookback))
                    .then_some(PricingReminder::JustExpired)
            })?;
            Some((*collection_id, reminder))
        })
        .collect();

    tracing::info!(
        collections = collection_ids.len(),
        reminders = reminders.len(),
        "computed pricing reminders"
    );
    Ok(reminders)
}
