use std::collections::BTreeMap;

use psymap_core::models::analysis::CompositeIndices;
use psymap_core::models::clinical::{CLINICAL_MAX, PredictedDistress};
use psymap_core::models::traits::{NormalizedTrait, Trait};

use crate::params::{PredictiveModel, SubscaleModel};

/// Map composites and trait percentiles onto expected DASS-21 scores.
pub fn predict(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    composites: &CompositeIndices,
    model: &PredictiveModel,
) -> PredictedDistress {
    PredictedDistress::from_fn(|subscale| predict_subscale(normalized, composites, model.get(subscale)))
}

fn predict_subscale(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    composites: &CompositeIndices,
    model: &SubscaleModel,
) -> f64 {
    // Absent traits add nothing.
    let direct: f64 = model
        .traits
        .iter()
        .filter_map(|(t, d)| normalized.get(t).map(|n| d * n.percentile / 100.0))
        .sum();

    let score = model.intercept + model.vulnerability * composites.vulnerability / 100.0
        - model.resilience * composites.resilience / 100.0
        + direct;
    score.clamp(0.0, f64::from(CLINICAL_MAX))
}
