//! Collection assembly: ranking deals and grouping them into the
//! collections a client renders.
//!
//! Two kinds of collection come out of a run. The nearby collection holds
//! whatever is pouring right now, capped per venue so one bar cannot flood
//! it. Tagged collections group deals by the curated slugs in their
//! `collection_tags`, merging any that share a display name.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::{
    auto_title, CollectionCatalog, CollectionMeta, UnknownTagPolicy, AUTO_TITLE_PRIORITY,
};
use crate::types::{Collection, EnrichedDeal};

/// Order two optional distances: nearer first, unknown last.
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort deals for display: active before inactive, then nearest first with
/// unlocated deals last. The sort is stable, so equal deals keep their
/// input order.
pub fn rank_deals(deals: &mut [EnrichedDeal]) {
    deals.sort_by(|a, b| {
        b.is_active
            .cmp(&a.is_active)
            .then_with(|| compare_distance(a.distance_km, b.distance_km))
    });
}

/// Build the currently-active collection from the selection pool.
///
/// Only active deals qualify. With deals from several venues each venue
/// contributes at most `max_per_venue` deals (its best-ranked ones); when a
/// single venue supplies every active deal the cap is waived so the
/// collection is not artificially thinned. Returns `None` when nothing is
/// active.
#[must_use]
pub fn assemble_nearby(
    pool: &[EnrichedDeal],
    meta: &CollectionMeta,
    max_per_venue: usize,
) -> Option<Collection> {
    let mut active: Vec<EnrichedDeal> = pool.iter().filter(|d| d.is_active).cloned().collect();
    if active.is_empty() {
        return None;
    }
    rank_deals(&mut active);

    let distinct_venues = {
        let mut ids: Vec<&str> = active.iter().map(|d| d.deal.venue_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    };

    let deals = if distinct_venues == 1 {
        active
    } else {
        // A cap of zero would keep nothing; clamp to one.
        let cap = max_per_venue.max(1);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut kept = Vec::new();
        for deal in &active {
            let count = counts.entry(deal.deal.venue_id.as_str()).or_insert(0);
            if *count < cap {
                *count += 1;
                kept.push(deal.clone());
            }
        }
        kept
    };

    Some(Collection {
        name: meta.display_name.clone(),
        description: meta.description.clone(),
        priority: meta.priority,
        deals,
    })
}

/// Collapse collections whose display names match case-insensitively into
/// one per name: the first occurrence keeps its metadata and position, deal
/// lists are unioned without duplicate deal ids, and each surviving
/// collection's deals are re-ranked.
///
/// Collection names are unique within a run; this pass enforces that, both
/// across tag slugs and between the nearby collection and a same-named
/// tagged one.
#[must_use]
pub fn merge_same_named(collections: Vec<Collection>) -> Vec<Collection> {
    let mut merged: Vec<(String, Collection)> = Vec::new();
    for collection in collections {
        let key = collection.name.to_lowercase();
        match merged.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                for deal in collection.deals {
                    if !existing.deals.iter().any(|d| d.deal.id == deal.deal.id) {
                        existing.deals.push(deal);
                    }
                }
            }
            None => merged.push((key, collection)),
        }
    }

    let mut out: Vec<Collection> = merged.into_iter().map(|(_, c)| c).collect();
    for collection in &mut out {
        rank_deals(&mut collection.deals);
    }
    out
}

/// Group the selection pool into tagged collections.
///
/// Tag slugs are gathered across the pool and processed in sorted order, so
/// output does not depend on deal order in the input data. Slugs absent
/// from the catalog follow `policy`. Collections whose display names match
/// case-insensitively are merged via [`merge_same_named`]: the first one
/// keeps its metadata, and a deal tagged into both appears once. Each
/// collection's deals are ranked, and the collections sort by priority
/// (stable, lower first).
#[must_use]
pub fn assemble_tagged(
    pool: &[EnrichedDeal],
    catalog: &CollectionCatalog,
    policy: UnknownTagPolicy,
) -> Vec<Collection> {
    let tagged: Vec<(usize, Vec<String>)> = pool
        .iter()
        .enumerate()
        .map(|(idx, deal)| (idx, deal.deal.tag_slugs()))
        .collect();

    let mut slugs: Vec<&str> = tagged
        .iter()
        .flat_map(|(_, slugs)| slugs.iter().map(String::as_str))
        .collect();
    slugs.sort_unstable();
    slugs.dedup();

    let mut collections: Vec<Collection> = Vec::new();
    for slug in slugs {
        let meta = match catalog.get(slug) {
            Some(meta) => meta.clone(),
            None => match policy {
                UnknownTagPolicy::AutoTitle => CollectionMeta {
                    display_name: auto_title(slug),
                    description: String::new(),
                    priority: AUTO_TITLE_PRIORITY,
                },
                UnknownTagPolicy::Drop => continue,
            },
        };

        let members: Vec<EnrichedDeal> = tagged
            .iter()
            .filter(|(_, slugs)| slugs.iter().any(|s| s == slug))
            .map(|(idx, _)| pool[*idx].clone())
            .collect();

        collections.push(Collection {
            name: meta.display_name,
            description: meta.description,
            priority: meta.priority,
            deals: members,
        });
    }

    let mut collections = merge_same_named(collections);
    collections.sort_by_key(|c| c.priority);
    collections
}
