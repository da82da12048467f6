//! Adjacency diversification for ranked deal lists.
//!
//! A strict rank order tends to cluster look-alikes: three house lagers in
//! a row, or one venue's whole menu back to back. This pass reorders a list
//! so adjacent entries differ on a chosen key, moving each pick as little
//! as possible from its ranked position.

use serde::{Deserialize, Serialize};

use crate::types::EnrichedDeal;

/// Which attribute adjacent deals must differ on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiversifyKey {
    /// Item name, compared case-insensitively.
    #[default]
    ItemName,
    /// Owning venue.
    Venue,
}

fn key_of(deal: &EnrichedDeal, key: DiversifyKey) -> String {
    match key {
        DiversifyKey::ItemName => deal.deal.item_name.to_lowercase(),
        DiversifyKey::Venue => deal.deal.venue_id.clone(),
    }
}

/// Reorder `deals` so no two adjacent entries share the key, where the
/// input admits it.
///
/// Greedy: each step takes the earliest remaining deal whose key differs
/// from the last emitted one, falling back to the front of the remainder
/// when every remaining deal shares that key. The output is a permutation
/// of the input; when all keys are distinct the order is untouched.
#[must_use]
pub fn diversify(deals: Vec<EnrichedDeal>, key: DiversifyKey) -> Vec<EnrichedDeal> {
    let mut remaining = deals;
    let mut out = Vec::with_capacity(remaining.len());
    let mut last_key: Option<String> = None;

    while !remaining.is_empty() {
        let pick = remaining
            .iter()
            .position(|deal| last_key.as_deref() != Some(key_of(deal, key).as_str()))
            .unwrap_or(0);
        let deal = remaining.remove(pick);
        last_key = Some(key_of(&deal, key));
        out.push(deal);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Deal;
    use rust_decimal::Decimal;

    fn enriched(id: &str, venue: &str, item: &str) -> EnrichedDeal {
        EnrichedDeal {
            deal: Deal {
                id: id.to_owned(),
                venue_id: venue.to_owned(),
                category: "beer".to_owned(),
                subcategory: String::new(),
                item_name: item.to_owned(),
                regular_price: Decimal::new(1500, 2),
                deal_price: Decimal::new(900, 2),
                valid_days: "all days".to_owned(),
                start_time: "17:00".to_owned(),
                end_time: "20:00".to_owned(),
                collection_tags: String::new(),
            },
            is_active: true,
            distance_km: Some(1.0),
        }
    }

    fn items(deals: &[EnrichedDeal]) -> Vec<&str> {
        deals.iter().map(|d| d.deal.item_name.as_str()).collect()
    }

    #[test]
    fn distinct_keys_keep_ranked_order() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v2", "Stout"),
            enriched("3", "v3", "Cider"),
        ];
        let out = diversify(deals, DiversifyKey::ItemName);
        assert_eq!(items(&out), vec!["Lager", "Stout", "Cider"]);
    }

    #[test]
    fn adjacent_duplicates_separate() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v2", "Lager"),
            enriched("3", "v3", "Stout"),
        ];
        let out = diversify(deals, DiversifyKey::ItemName);
        assert_eq!(items(&out), vec!["Lager", "Stout", "Lager"]);
    }

    #[test]
    fn item_key_is_case_insensitive() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v2", "LAGER"),
            enriched("3", "v3", "Stout"),
        ];
        let out = diversify(deals, DiversifyKey::ItemName);
        assert_eq!(items(&out), vec!["Lager", "Stout", "LAGER"]);
    }

    #[test]
    fn uniform_keys_stay_in_order() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v2", "Lager"),
            enriched("3", "v3", "Lager"),
        ];
        let out = diversify(deals, DiversifyKey::ItemName);
        let order: Vec<&str> = out.iter().map(|d| d.deal.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }

    #[test]
    fn output_is_permutation_of_input() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v1", "Lager"),
            enriched("3", "v2", "Stout"),
            enriched("4", "v2", "Stout"),
            enriched("5", "v3", "Cider"),
        ];
        let out = diversify(deals, DiversifyKey::ItemName);
        let mut seen: Vec<&str> = out.iter().map(|d| d.deal.id.as_str()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn venue_key_separates_same_venue_runs() {
        let deals = vec![
            enriched("1", "v1", "Lager"),
            enriched("2", "v1", "Stout"),
            enriched("3", "v2", "Cider"),
        ];
        let out = diversify(deals, DiversifyKey::Venue);
        let venues: Vec<&str> = out.iter().map(|d| d.deal.venue_id.as_str()).collect();
        assert_eq!(venues, vec!["v1", "v2", "v1"]);
    }

    #[test]
    fn empty_and_singleton_pass_through() {
        assert!(diversify(Vec::new(), DiversifyKey::ItemName).is_empty());
        let out = diversify(vec![enriched("1", "v1", "Lager")], DiversifyKey::ItemName);
        assert_eq!(out.len(), 1);
    }
}
