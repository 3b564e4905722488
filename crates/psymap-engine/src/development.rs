use std::collections::BTreeMap;

use psymap_core::models::analysis::{DevelopmentalReadiness, MotivationalProfile, ZpdTier};
use psymap_core::models::traits::{NormalizedTrait, Trait};

use crate::composite::weighted_index;
use crate::params::{DevelopmentParameters, MotivationWeights};

/// Zone-of-proximal-development tier from a weighted learning-capacity index.
pub fn estimate_zpd(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    params: &DevelopmentParameters,
) -> DevelopmentalReadiness {
    let capacity = weighted_index(normalized, &params.capacity);
    let tier = if capacity < params.scaffolding_below {
        ZpdTier::Scaffolding
    } else if capacity < params.balanced_below {
        ZpdTier::Balanced
    } else {
        ZpdTier::Autonomous
    };
    DevelopmentalReadiness {
        level: tier.level(),
        tier,
        capacity,
    }
}

/// Self-determination needs, each from its own disjoint trait subset.
pub fn estimate_sdt(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    weights: &MotivationWeights,
) -> MotivationalProfile {
    MotivationalProfile {
        autonomy: weighted_index(normalized, &weights.autonomy),
        competence: weighted_index(normalized, &weights.competence),
        relatedness: weighted_index(normalized, &weights.relatedness),
    }
}
