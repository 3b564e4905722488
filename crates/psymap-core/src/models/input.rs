use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::clinical::ClinicalSnapshot;
use super::traits::TraitBundle;

/// Everything the caller hands the engine for one analysis.
///
/// History is pre-fetched by the caller; the engine never queries a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisInput {
    pub traits: TraitBundle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub clinical: Option<ClinicalSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoricalSnapshot>,
}

impl AnalysisInput {
    pub fn new(traits: TraitBundle) -> Self {
        Self {
            traits,
            ..Self::default()
        }
    }

    pub fn with_clinical(mut self, clinical: ClinicalSnapshot) -> Self {
        self.clinical = Some(clinical);
        self
    }

    pub fn with_history(mut self, history: Vec<HistoricalSnapshot>) -> Self {
        self.history = history;
        self
    }
}

/// A prior measurement of the same person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoricalSnapshot {
    pub taken_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub traits: Option<TraitBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub clinical: Option<ClinicalSnapshot>,
}
