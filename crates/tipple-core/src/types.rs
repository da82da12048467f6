//! Boundary types for the ranking pipeline.
//!
//! Deals and venues arrive from the caller as a [`Snapshot`] and are never
//! mutated; enrichment builds new [`EnrichedDeal`] records, so one snapshot
//! can serve repeated runs without drift.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One promotional offer at one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Caller-assigned identifier, kept as a string to stay agnostic of the
    /// upstream id scheme.
    pub id: String,
    /// Owning venue reference; many deals to one venue.
    pub venue_id: String,
    pub category: String,
    pub subcategory: String,
    /// Drink display name, e.g. `"Tiger Pint"`. Free-form.
    pub item_name: String,
    /// Non-discounted price. `deal_price <= regular_price` is expected but
    /// not enforced upstream.
    #[serde(with = "rust_decimal::serde::str")]
    pub regular_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deal_price: Decimal,
    /// Human-authored day description, e.g. `"all days"`, `"mon-fri"`,
    /// `"Tue,Thu"`. Parsed once per run by
    /// [`crate::schedule::DaySet::parse`].
    pub valid_days: String,
    /// `"HH:MM"` or compact `"HHMM"`, local to the shared venue timezone.
    pub start_time: String,
    pub end_time: String,
    /// Comma-separated tag slugs, e.g. `"beers_under_10,one_for_one_deals"`.
    pub collection_tags: String,
}

impl Deal {
    /// Percentage saved off the regular price, rounded to one decimal place.
    ///
    /// `None` when the regular price is zero (undefined) or the "discount"
    /// is negative (authored data error; better hidden than shown as a
    /// negative saving).
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        if self.regular_price <= Decimal::ZERO || self.deal_price > self.regular_price {
            return None;
        }
        let saved = self.regular_price - self.deal_price;
        Some((saved / self.regular_price * Decimal::ONE_HUNDRED).round_dp(1))
    }

    /// Tag slugs split out of `collection_tags`: trimmed, lowercased, empty
    /// entries dropped.
    #[must_use]
    pub fn tag_slugs(&self) -> Vec<String> {
        self.collection_tags
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// A physical establishment that offers deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    /// Decimal degrees. Either may be absent or non-finite in authored
    /// data; such venues are unrankable by distance.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Display-only fields, opaque to the pipeline.
    pub address: Option<String>,
    pub cuisine: Option<String>,
    pub image_url: Option<String>,
}

impl Venue {
    /// The venue's position, when both coordinates are present and finite.
    #[must_use]
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => {
                let point = GeoPoint::new(lat, lng);
                point.is_finite().then_some(point)
            }
            _ => None,
        }
    }
}

/// A deal plus the per-request derived fields.
///
/// Ephemeral: computed for one (viewer, instant) evaluation and never
/// persisted. Serializes as the deal's own fields plus `is_active` and
/// `distance_km`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDeal {
    #[serde(flatten)]
    pub deal: Deal,
    /// Whether the deal's day and clock windows both match the evaluation
    /// instant.
    pub is_active: bool,
    /// Great-circle distance from the viewer in kilometers. `None` when the
    /// owning venue is unknown or has no usable coordinates.
    pub distance_km: Option<f64>,
}

/// A named, priority-ordered display grouping of deals.
///
/// Within one pipeline run, collection names are unique case-insensitively;
/// tags that normalize to the same display name merge rather than producing
/// duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub description: String,
    /// Lower sorts first.
    pub priority: i32,
    pub deals: Vec<EnrichedDeal>,
}

/// The caller-supplied input: flat venue and deal lists joined on
/// [`Deal::venue_id`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub venues: Vec<Venue>,
    pub deals: Vec<Deal>,
}

impl Snapshot {
    /// Venue lookup keyed by id. When the snapshot carries duplicate venue
    /// ids, the later record wins, matching the upstream store's last-write
    /// semantics.
    #[must_use]
    pub fn venue_index(&self) -> HashMap<&str, &Venue> {
        self.venues.iter().map(|v| (v.id.as_str(), v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_deal(regular: Decimal, deal: Decimal) -> Deal {
        Deal {
            id: "d1".to_string(),
            venue_id: "v1".to_string(),
            category: "Beer".to_string(),
            subcategory: "Lager".to_string(),
            item_name: "Tiger Pint".to_string(),
            regular_price: regular,
            deal_price: deal,
            valid_days: "all days".to_string(),
            start_time: "17:00".to_string(),
            end_time: "20:00".to_string(),
            collection_tags: "beers_under_10, One_For_One_Deals,,".to_string(),
        }
    }

    fn make_venue(lat: Option<f64>, lng: Option<f64>) -> Venue {
        Venue {
            id: "v1".to_string(),
            name: "The Long Bar".to_string(),
            latitude: lat,
            longitude: lng,
            address: Some("1 Beach Rd".to_string()),
            cuisine: None,
            image_url: None,
        }
    }

    // -----------------------------------------------------------------------
    // Deal helpers
    // -----------------------------------------------------------------------

    #[test]
    fn discount_percent_typical() {
        let deal = make_deal(Decimal::new(1600, 2), Decimal::new(1200, 2));
        assert_eq!(deal.discount_percent(), Some(Decimal::new(250, 1))); // 25.0
    }

    #[test]
    fn discount_percent_rounds_to_one_decimal() {
        let deal = make_deal(Decimal::new(900, 2), Decimal::new(600, 2));
        // 33.333…% → 33.3%
        assert_eq!(deal.discount_percent(), Some(Decimal::new(333, 1)));
    }

    #[test]
    fn discount_percent_zero_regular_price_is_none() {
        let deal = make_deal(Decimal::ZERO, Decimal::ZERO);
        assert!(deal.discount_percent().is_none());
    }

    #[test]
    fn discount_percent_negative_discount_is_none() {
        let deal = make_deal(Decimal::new(1000, 2), Decimal::new(1200, 2));
        assert!(deal.discount_percent().is_none());
    }

    #[test]
    fn tag_slugs_trim_lowercase_and_drop_empties() {
        let deal = make_deal(Decimal::ONE, Decimal::ONE);
        assert_eq!(
            deal.tag_slugs(),
            vec!["beers_under_10".to_string(), "one_for_one_deals".to_string()]
        );
    }

    #[test]
    fn tag_slugs_empty_string_yields_nothing() {
        let mut deal = make_deal(Decimal::ONE, Decimal::ONE);
        deal.collection_tags = String::new();
        assert!(deal.tag_slugs().is_empty());
    }

    // -----------------------------------------------------------------------
    // Venue position
    // -----------------------------------------------------------------------

    #[test]
    fn position_present_when_both_coordinates_finite() {
        let venue = make_venue(Some(1.3), Some(103.8));
        let p = venue.position().expect("expected a position");
        assert!((p.lat - 1.3).abs() < 1e-12);
        assert!((p.lng - 103.8).abs() < 1e-12);
    }

    #[test]
    fn position_absent_when_a_coordinate_is_missing() {
        assert!(make_venue(Some(1.3), None).position().is_none());
        assert!(make_venue(None, Some(103.8)).position().is_none());
        assert!(make_venue(None, None).position().is_none());
    }

    #[test]
    fn position_absent_when_a_coordinate_is_nan() {
        assert!(make_venue(Some(f64::NAN), Some(103.8)).position().is_none());
    }

    // -----------------------------------------------------------------------
    // Serde shapes
    // -----------------------------------------------------------------------

    #[test]
    fn enriched_deal_flattens_deal_fields() {
        let enriched = EnrichedDeal {
            deal: make_deal(Decimal::new(1600, 2), Decimal::new(1200, 2)),
            is_active: true,
            distance_km: Some(0.15),
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["id"], "d1");
        assert_eq!(json["regular_price"], "16.00");
        assert_eq!(json["is_active"], true);
        assert!(json["distance_km"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn deal_prices_parse_from_strings() {
        let json = r#"{
            "id": "d9",
            "venue_id": "v9",
            "category": "Wine",
            "subcategory": "Red",
            "item_name": "House Merlot",
            "regular_price": "18.00",
            "deal_price": "9.00",
            "valid_days": "mon-fri",
            "start_time": "1700",
            "end_time": "1930",
            "collection_tags": "wine_deals"
        }"#;
        let deal: Deal = serde_json::from_str(json).unwrap();
        assert_eq!(deal.deal_price, Decimal::new(900, 2));
        assert_eq!(deal.discount_percent(), Some(Decimal::new(500, 1)));
    }

    #[test]
    fn venue_index_later_duplicate_wins() {
        let mut first = make_venue(Some(1.0), Some(100.0));
        first.name = "Old Name".to_string();
        let mut second = make_venue(Some(2.0), Some(101.0));
        second.name = "New Name".to_string();
        let snapshot = Snapshot {
            venues: vec![first, second],
            deals: vec![],
        };
        assert_eq!(snapshot.venue_index()["v1"].name, "New Name");
    }
}
