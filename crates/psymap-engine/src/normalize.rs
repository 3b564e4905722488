use std::collections::BTreeMap;

use psymap_core::models::traits::{NormalizedTrait, Trait, TraitBundle};
use psymap_norms::NormTable;

use crate::error::EngineError;

/// Place every supplied raw score on its reference distribution.
///
/// Traits absent from the bundle are absent from the result. Any raw value
/// outside [1, 5] rejects the whole bundle.
pub fn normalize(
    bundle: &TraitBundle,
    norms: &NormTable,
) -> Result<BTreeMap<Trait, NormalizedTrait>, EngineError> {
    bundle.validate_ranges()?;

    bundle
        .scores
        .iter()
        .map(|(&name, &raw_value)| -> Result<_, EngineError> {
            let percentile = norms.percentile(name, raw_value)?;
            Ok((
                name,
                NormalizedTrait {
                    name,
                    raw_value,
                    percentile,
                },
            ))
        })
        .collect()
}
