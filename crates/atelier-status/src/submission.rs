//! # Collection Submission Status
//!
//! Rolls per-design lifecycle states up to four collection milestones.
//! A milestone holds when *every* design in the collection has reached at
//! least the corresponding state:
//!
//! | Milestone | Every design is at least |
//! |---|---|
//! | `is_submitted` | `SUBMITTED` |
//! | `is_costed` | `COSTED` |
//! | `is_quoted` | `CHECKED_OUT` |
//! | `is_paired` | `PAIRED` |
//!
//! Because the thresholds are nested, the milestones always form the chain
//! `is_paired ⇒ is_quoted ⇒ is_costed ⇒ is_submitted`.
//!
//! An empty collection reaches no milestone. "Every design" over an empty
//! set would be vacuously true; a collection with nothing in it is still
//! not submitted, so the roll-up requires at least one design.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use atelier_core::{CollectionId, DesignWithMeta, Timestamp};
use atelier_state::{design_state, earliest_expiration, DesignState};

use crate::error::StatusError;
use crate::source::DesignSource;

/// The derived milestone view of one collection. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStatus {
    /// The collection this status describes.
    pub collection_id: CollectionId,
    /// Every design has been submitted (or costed directly).
    pub is_submitted: bool,
    /// Every design has live pricing or is further along.
    pub is_costed: bool,
    /// Every design has been checked out.
    pub is_quoted: bool,
    /// Every design has a paired production partner.
    pub is_paired: bool,
    /// The soonest future expiration of any cost input in the collection.
    pub pricing_expires_at: Option<Timestamp>,
}

impl SubmissionStatus {
    /// The status of a collection with no designs.
    pub fn empty(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            is_submitted: false,
            is_costed: false,
            is_quoted: false,
            is_paired: false,
            pricing_expires_at: None,
        }
    }

    /// Roll up the designs of one collection as of `now`.
    pub fn from_designs(
        collection_id: CollectionId,
        designs: &[&DesignWithMeta],
        now: Timestamp,
    ) -> Self {
        if designs.is_empty() {
            return Self::empty(collection_id);
        }

        let states: Vec<DesignState> = designs.iter().map(|d| design_state(d, now)).collect();
        let all_reached = |milestone: DesignState| states.iter().all(|s| s.has_reached(milestone));

        let cost_inputs: Vec<_> = designs
            .iter()
            .flat_map(|d| d.cost_inputs.iter().cloned())
            .collect();

        Self {
            collection_id,
            is_submitted: all_reached(DesignState::Submitted),
            is_costed: all_reached(DesignState::Costed),
            is_quoted: all_reached(DesignState::CheckedOut),
            is_paired: all_reached(DesignState::Paired),
            pricing_expires_at: earliest_expiration(&cost_inputs, now),
        }
    }
}

/// Compute the status of every collection in `collection_ids` from
/// already-fetched `designs`.
///
/// Every requested id appears in the result, including collections with no
/// designs. Designs belonging to collections that were not requested are
/// ignored.
pub fn summarize_collections(
    collection_ids: &[CollectionId],
    designs: &[DesignWithMeta],
    now: Timestamp,
) -> HashMap<CollectionId, SubmissionStatus> {
    let mut by_collection: HashMap<CollectionId, Vec<&DesignWithMeta>> =
        collection_ids.iter().map(|id| (*id, Vec::new())).collect();
    for design in designs {
        if let Some(members) = by_collection.get_mut(&design.collection_id) {
            members.push(design);
        }
    }

    by_collection
        .into_iter()
        .map(|(collection_id, members)| {
            let status = SubmissionStatus::from_designs(collection_id, &members, now);
            (collection_id, status)
        })
        .collect()
}

/// Fetch the designs of `collection_ids` and compute each collection's status.
pub async fn determine_submission_status<S>(
    source: &S,
    collection_ids: &[CollectionId],
    now: Timestamp,
) -> Result<HashMap<CollectionId, SubmissionStatus>, StatusError>
where
    S: DesignSource + ?Sized,
{
    let designs = source
        .find_designs_with_costs_and_events_by_collection_ids(collection_ids)
        .await?;
    let statuses = summarize_collections(collection_ids, &designs, now);

    tracing::debug!(
        collections = statuses.len(),
        designs = designs.len(),
        submitted = statuses.values().filter(|s| s.is_submitted).count(),
        costed = statuses.values().filter(|s| s.is_costed).count(),
        "derived collection submission status"
    );
    Ok(statuses)
}
