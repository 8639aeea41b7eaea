//! Collection membership and cost-input queries, and the in-memory join
//! that bundles them with event logs into [`DesignWithMeta`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use atelier_core::{CollectionId, CostInput, DesignId, DesignWithMeta, DomainEvent, Timestamp};

use crate::source::SourceResult;

/// Fetch `(design, collection)` pairs for every design in `collection_ids`.
pub async fn find_members(
    pool: &PgPool,
    collection_ids: &[CollectionId],
) -> SourceResult<Vec<(DesignId, CollectionId)>> {
    if collection_ids.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = collection_ids.iter().map(|id| id.0).collect();
    let rows = sqlx::query_as::<_, (Uuid, Uuid)>(
        "SELECT design_id, collection_id FROM collection_designs
         WHERE collection_id = ANY($1)
         ORDER BY collection_id, design_id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(design_id, collection_id)| (design_id.into(), collection_id.into()))
        .collect())
}

/// Fetch the live (not soft-deleted) cost inputs of `design_ids`.
pub async fn find_cost_inputs(
    pool: &PgPool,
    design_ids: &[DesignId],
) -> SourceResult<Vec<CostInput>> {
    let ids: Vec<Uuid> = design_ids.iter().map(|id| id.0).collect();
    let rows = sqlx::query_as::<_, CostInputRow>(
        "SELECT id, design_id, expires_at FROM pricing_cost_inputs
         WHERE design_id = ANY($1) AND deleted_at IS NULL
         ORDER BY created_at ASC",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CostInputRow::into_cost_input).collect())
}

/// Bundle membership rows, cost inputs and events into designs.
///
/// Events keep their relative order, so a globally `created_at`-ordered
/// event list yields per-design logs in creation order. A design listed
/// under several collections gets its full rows in each of them.
pub fn assemble(
    members: Vec<(DesignId, CollectionId)>,
    cost_inputs: Vec<CostInput>,
    events: Vec<DomainEvent>,
) -> Vec<DesignWithMeta> {
    let mut costs_by_design: HashMap<DesignId, Vec<CostInput>> = HashMap::new();
    for cost_input in cost_inputs {
        costs_by_design
            .entry(cost_input.design_id)
            .or_default()
            .push(cost_input);
    }

    let mut events_by_design: HashMap<DesignId, Vec<DomainEvent>> = HashMap::new();
    for event in events {
        events_by_design.entry(event.design_id).or_default().push(event);
    }

    members
        .into_iter()
        .map(|(id, collection_id)| DesignWithMeta {
            id,
            collection_id,
            cost_inputs: costs_by_design.get(&id).cloned().unwrap_or_default(),
            events: events_by_design.get(&id).cloned().unwrap_or_default(),
        })
        .collect()
}

/// Row type for the `pricing_cost_inputs` table.
#[derive(Debug, sqlx::FromRow)]
struct CostInputRow {
    id: Uuid,
    design_id: Uuid,
    expires_at: Option<DateTime<Utc>>,
}

impl CostInputRow {
    fn into_cost_input(self) -> CostInput {
        CostInput {
            id: self.id.into(),
            design_id: self.design_id.into(),
            expires_at: self.expires_at.map(Timestamp::from_utc),
        }
    }
}
