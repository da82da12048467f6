//! Tiered radius expansion around the viewer.
//!
//! Rather than a single fixed cutoff, the search widens through a ladder of
//! radii and stops at the first tier that has at least one currently active
//! deal. A viewer in a dense area gets tightly local results; a viewer in a
//! sparse area still gets something without the dense case paying for it.

use crate::error::CoreError;
use crate::types::EnrichedDeal;

/// Default search ladder, in kilometres.
pub const DEFAULT_TIERS_KM: [f64; 3] = [5.0, 10.0, 15.0];

/// The outcome of tier selection: the surviving deals and the radius that
/// produced them.
#[derive(Debug, Clone)]
pub struct TierSelection {
    pub deals: Vec<EnrichedDeal>,
    pub radius_km: f64,
}

/// Check that a tier ladder is usable: non-empty, every radius finite and
/// positive, strictly ascending.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTiers`] naming the first violated rule.
pub fn validate_tiers(tiers: &[f64]) -> Result<(), CoreError> {
    if tiers.is_empty() {
        return Err(CoreError::InvalidTiers {
            reason: "tier list is empty".to_owned(),
        });
    }
    for &radius in tiers {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(CoreError::InvalidTiers {
                reason: format!("radius {radius} is not a positive finite number"),
            });
        }
    }
    for pair in tiers.windows(2) {
        if pair[0] >= pair[1] {
            return Err(CoreError::InvalidTiers {
                reason: format!("radii must be strictly ascending, got {} then {}", pair[0], pair[1]),
            });
        }
    }
    Ok(())
}

/// Walk the tier ladder and return the first tier containing an active deal.
///
/// Membership in a tier is inclusive (`distance <= radius`); deals with no
/// distance (unlocated venue) belong to no tier. When no tier has an active
/// deal, the smallest tier's deals are returned anyway so the caller can
/// still show upcoming windows nearby.
///
/// # Errors
///
/// Returns [`CoreError::InvalidTiers`] when the ladder fails
/// [`validate_tiers`].
pub fn select_within_tiers(
    deals: &[EnrichedDeal],
    tiers: &[f64],
) -> Result<TierSelection, CoreError> {
    validate_tiers(tiers)?;

    let within = |radius: f64| -> Vec<EnrichedDeal> {
        deals
            .iter()
            .filter(|deal| deal.distance_km.is_some_and(|km| km <= radius))
            .cloned()
            .collect()
    };

    for &radius in tiers {
        let candidates = within(radius);
        if candidates.iter().any(|deal| deal.is_active) {
            return Ok(TierSelection {
                deals: candidates,
                radius_km: radius,
            });
        }
    }

    let smallest = tiers[0];
    Ok(TierSelection {
        deals: within(smallest),
        radius_km: smallest,
    })
}
