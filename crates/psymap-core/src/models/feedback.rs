use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::InputError;

use super::analysis::CompositeIndices;
use super::clinical::{ClinicalSnapshot, PredictedDistress, Subscale};

/// The parts of an earlier analysis a feedback record is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriorPrediction {
    pub predicted: PredictedDistress,
    pub composites: CompositeIndices,
    pub model_version: u32,
    pub predicted_at: jiff::Timestamp,
}

impl PriorPrediction {
    /// Range check for a prediction read back from outside the engine.
    pub fn validate(&self) -> Result<(), InputError> {
        self.predicted.validate()?;
        self.composites.validate()
    }
}

/// Actual minus predicted, per subscale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DistressDelta {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
}

impl DistressDelta {
    pub fn get(&self, subscale: Subscale) -> f64 {
        match subscale {
            Subscale::Depression => self.depression,
            Subscale::Anxiety => self.anxiety,
            Subscale::Stress => self.stress,
        }
    }
}

/// A logged comparison between a prior prediction and a later measurement.
///
/// Immutable once written; consumed only by offline calibration analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictionFeedbackRecord {
    pub id: Uuid,
    pub user_ref: String,
    pub predicted: PredictedDistress,
    pub actual: ClinicalSnapshot,
    pub delta: DistressDelta,
    pub mae: f64,
    pub composites_at_prediction: CompositeIndices,
    pub segment_tag: String,
    pub model_version: u32,
    pub predicted_at: jiff::Timestamp,
    pub recorded_at: jiff::Timestamp,
}
