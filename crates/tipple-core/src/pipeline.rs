//! The full ranking pipeline, from raw snapshot to display-ready
//! collections.
//!
//! Everything here is a pure function of its arguments: the snapshot is
//! never mutated, the evaluation instant is injected, and identical inputs
//! give byte-identical serialized output. Callers that want caching or
//! concurrency layer it outside.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::assemble::{assemble_nearby, assemble_tagged, merge_same_named};
use crate::catalog::{CollectionCatalog, CollectionMeta, UnknownTagPolicy};
use crate::diversify::{diversify, DiversifyKey};
use crate::error::CoreError;
use crate::geo::{haversine_km, GeoPoint};
use crate::radius::{select_within_tiers, DEFAULT_TIERS_KM};
use crate::schedule::Schedule;
use crate::types::{Collection, EnrichedDeal, Snapshot};

/// Tunable knobs for a pipeline run. [`PipelineConfig::default`] matches
/// production behavior.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Ascending search ladder in kilometres.
    pub radius_tiers_km: Vec<f64>,
    /// Handling for tag slugs missing from the catalog.
    pub unknown_tags: UnknownTagPolicy,
    /// Key adjacent deals must differ on within a collection.
    pub diversify_key: DiversifyKey,
    /// Display metadata for the currently-active collection.
    pub nearby: CollectionMeta,
    /// Per-venue cap in the nearby collection (waived under single-venue
    /// dominance).
    pub nearby_max_per_venue: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            radius_tiers_km: DEFAULT_TIERS_KM.to_vec(),
            unknown_tags: UnknownTagPolicy::default(),
            diversify_key: DiversifyKey::default(),
            nearby: CollectionMeta {
                display_name: "Active Nearby".to_owned(),
                description: "Happy hours pouring near you right now.".to_owned(),
                priority: 0,
            },
            nearby_max_per_venue: 1,
        }
    }
}

/// A completed run: the collections to render plus the context they were
/// computed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCollections {
    /// The injected evaluation instant, in the shared venue timezone.
    pub evaluated_at: NaiveDateTime,
    /// The radius tier the deals were drawn from.
    pub radius_km: f64,
    pub collections: Vec<Collection>,
}

/// Join deals to venues and annotate each with activation and distance.
///
/// Produces new records; the snapshot itself is untouched. Deals whose
/// venue is missing or unlocated get `distance_km: None` and drop out at
/// the radius stage.
#[must_use]
pub fn enrich_deals(snapshot: &Snapshot, viewer: GeoPoint, now: NaiveDateTime) -> Vec<EnrichedDeal> {
    let venues = snapshot.venue_index();
    snapshot
        .deals
        .iter()
        .map(|deal| {
            let schedule = Schedule::parse(&deal.valid_days, &deal.start_time, &deal.end_time);
            let distance_km = venues
                .get(deal.venue_id.as_str())
                .and_then(|venue| venue.position())
                .map(|position| haversine_km(viewer, position));
            EnrichedDeal {
                deal: deal.clone(),
                is_active: schedule.is_active_at(now),
                distance_km,
            }
        })
        .collect()
}

/// Run the whole pipeline for one viewer and instant.
///
/// Steps:
/// 1. validate the viewer position and the tier ladder;
/// 2. enrich every deal with activation and distance;
/// 3. walk the radius tiers to pick the candidate pool;
/// 4. build the currently-active collection from the pool;
/// 5. build the tagged collections from the pool;
/// 6. merge collections that share a display name, order by priority, and
///    diversify each one's deals.
///
/// # Errors
///
/// Returns [`CoreError::NonFiniteViewer`] for a NaN or infinite viewer
/// coordinate and [`CoreError::InvalidTiers`] for an unusable ladder. Bad
/// deal data never errors; it degrades per field (inactive, unranked, or
/// untagged).
pub fn rank_collections(
    snapshot: &Snapshot,
    viewer: GeoPoint,
    now: NaiveDateTime,
    catalog: &CollectionCatalog,
    config: &PipelineConfig,
) -> Result<RankedCollections, CoreError> {
    if !viewer.is_finite() {
        return Err(CoreError::NonFiniteViewer {
            lat: viewer.lat,
            lng: viewer.lng,
        });
    }

    let enriched = enrich_deals(snapshot, viewer, now);
    let active = enriched.iter().filter(|d| d.is_active).count();
    tracing::debug!(deals = enriched.len(), active, "enriched snapshot");

    let selection = select_within_tiers(&enriched, &config.radius_tiers_km)?;
    tracing::debug!(
        radius_km = selection.radius_km,
        deals = selection.deals.len(),
        "radius tier selected"
    );

    let mut collections: Vec<Collection> = Vec::new();
    if let Some(nearby) = assemble_nearby(&selection.deals, &config.nearby, config.nearby_max_per_venue)
    {
        collections.push(nearby);
    }
    collections.extend(assemble_tagged(&selection.deals, catalog, config.unknown_tags));
    // A catalog entry may render with the nearby collection's name; names
    // stay unique per run, and the nearby metadata wins the merge because
    // it was inserted first.
    let mut collections = merge_same_named(collections);
    collections.sort_by_key(|c| c.priority);

    for collection in &mut collections {
        let deals = std::mem::take(&mut collection.deals);
        collection.deals = diversify(deals, config.diversify_key);
    }
    tracing::debug!(collections = collections.len(), "assembled collections");

    Ok(RankedCollections {
        evaluated_at: now,
        radius_km: selection.radius_km,
        collections,
    })
}
