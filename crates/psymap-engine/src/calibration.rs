use psymap_core::models::analysis::CompositeIndices;
use psymap_core::models::clinical::{ClinicalSnapshot, Subscale};
use psymap_core::models::feedback::{DistressDelta, PredictionFeedbackRecord, PriorPrediction};
use uuid::Uuid;

use crate::error::EngineError;
use crate::params::SegmentBands;

/// Compare a prior prediction with a later measurement.
///
/// Pure: the id and timestamp come from the caller, and persisting the
/// record is the caller's job.
pub fn record_feedback(
    prior: &PriorPrediction,
    actual: ClinicalSnapshot,
    user_ref: &str,
    id: Uuid,
    recorded_at: jiff::Timestamp,
    bands: &SegmentBands,
) -> Result<PredictionFeedbackRecord, EngineError> {
    prior.validate()?;
    actual.validate()?;

    let diff = |s: Subscale| f64::from(actual.get(s)) - prior.predicted.get(s);
    let delta = DistressDelta {
        depression: diff(Subscale::Depression),
        anxiety: diff(Subscale::Anxiety),
        stress: diff(Subscale::Stress),
    };
    let mae = Subscale::ALL.iter().map(|s| delta.get(*s).abs()).sum::<f64>()
        / Subscale::ALL.len() as f64;

    Ok(PredictionFeedbackRecord {
        id,
        user_ref: user_ref.to_string(),
        predicted: prior.predicted,
        actual,
        delta,
        mae,
        composites_at_prediction: prior.composites,
        segment_tag: segment_tag(&prior.composites, bands),
        model_version: prior.model_version,
        predicted_at: prior.predicted_at,
        recorded_at,
    })
}

/// `"{band}_vulnerability/{band}_resilience"`, e.g. `high_vulnerability/low_resilience`.
pub fn segment_tag(composites: &CompositeIndices, bands: &SegmentBands) -> String {
    format!(
        "{}_vulnerability/{}_resilience",
        bands.label(composites.vulnerability),
        bands.label(composites.resilience)
    )
}
