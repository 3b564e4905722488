use std::collections::BTreeMap;

use psymap_core::models::analysis::CompositeIndices;
use psymap_core::models::traits::{NormalizedTrait, Trait};

use crate::params::{CompositeWeights, WeightTable};

/// Index value when nothing contributes.
pub const NEUTRAL: f64 = 50.0;

/// `50 + Σ w·(p − 50) / Σ|w|`, clamped to [0, 100].
///
/// The divisor covers the whole table, so a missing trait pulls the index
/// toward neutral instead of being renormalized away.
pub fn weighted_index(normalized: &BTreeMap<Trait, NormalizedTrait>, weights: &WeightTable) -> f64 {
    let total: f64 = weights.values().map(|w| w.abs()).sum();
    if total == 0.0 {
        return NEUTRAL;
    }
    let shift: f64 = weights
        .iter()
        .filter_map(|(t, w)| normalized.get(t).map(|n| w * (n.percentile - NEUTRAL)))
        .sum();
    (NEUTRAL + shift / total).clamp(0.0, 100.0)
}

pub fn compute_composites(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    weights: &CompositeWeights,
) -> CompositeIndices {
    CompositeIndices {
        vulnerability: weighted_index(normalized, &weights.vulnerability),
        resilience: weighted_index(normalized, &weights.resilience),
    }
}
