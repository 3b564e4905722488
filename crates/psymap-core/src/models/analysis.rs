use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InputError;

use super::clinical::{PredictedDistress, SeverityBand, Subscale, SubscaleContribution};
use super::feedback::PriorPrediction;
use super::traits::{NormalizedTrait, Trait};

/// Confidence tier reflecting which optional inputs were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CompletenessGrade {
    Minimal,
    Partial,
    Complete,
}

/// The two bounded summary indices, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CompositeIndices {
    pub vulnerability: f64,
    pub resilience: f64,
}

impl CompositeIndices {
    pub fn validate(&self) -> Result<(), InputError> {
        for (field, value) in [
            ("vulnerability", self.vulnerability),
            ("resilience", self.resilience),
        ] {
            if !(value.is_finite() && (0.0..=100.0).contains(&value)) {
                return Err(InputError::InvalidRawScore {
                    field: field.to_string(),
                    value,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }
        Ok(())
    }
}

/// A knowledge-base pathway whose trigger held for this profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Mechanism {
    pub id: String,
    pub pathway: String,
    /// Activation strength in [0, 1].
    pub strength: f64,
    /// Predicted DASS points attributed to this pathway.
    pub contribution: SubscaleContribution,
}

/// A protective pattern buffering one active mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Compensation {
    pub id: String,
    pub condition: String,
    pub mechanism: String,
    pub strength_label: String,
    /// Percentile of the protective trait.
    pub percentile: f64,
    /// Id of the buffered mechanism.
    pub buffers: String,
    /// DASS points of the buffered mechanism's contribution offset here.
    pub offset: SubscaleContribution,
}

/// Predicted distress not explained by the rule base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResidualDistress {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
    pub interpretation: String,
}

impl ResidualDistress {
    pub fn get(&self, subscale: Subscale) -> f64 {
        match subscale {
            Subscale::Depression => self.depression,
            Subscale::Anxiety => self.anxiety,
            Subscale::Stress => self.stress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MechanismAnalysis {
    pub active: Vec<Mechanism>,
    pub compensations: Vec<Compensation>,
    pub residual: ResidualDistress,
}

impl MechanismAnalysis {
    pub fn total_contribution(&self, subscale: Subscale) -> f64 {
        self.active.iter().map(|m| m.contribution.get(subscale)).sum()
    }

    pub fn total_offset(&self, subscale: Subscale) -> f64 {
        self.compensations.iter().map(|c| c.offset.get(subscale)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ZpdTier {
    Scaffolding,
    Balanced,
    Autonomous,
}

impl ZpdTier {
    pub fn level(&self) -> u8 {
        match self {
            ZpdTier::Scaffolding => 1,
            ZpdTier::Balanced => 2,
            ZpdTier::Autonomous => 3,
        }
    }
}

/// Zone-of-proximal-development estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DevelopmentalReadiness {
    pub level: u8,
    pub tier: ZpdTier,
    pub capacity: f64,
}

/// Self-determination-theory need estimates, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MotivationalProfile {
    pub autonomy: f64,
    pub competence: f64,
    pub relatedness: f64,
}

/// Clinical detail, present only when a measured snapshot was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalSection {
    pub severity: BTreeMap<Subscale, SeverityBand>,
    /// Measured minus predicted, per subscale.
    pub prediction_gap: BTreeMap<Subscale, f64>,
    pub risk_factors: Vec<RiskFactor>,
    pub elevated: bool,
}

/// An active mechanism whose main subscale is clinically elevated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskFactor {
    pub mechanism: String,
    pub pathway: String,
    pub subscale: Subscale,
    pub severity: SeverityBand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrendDirection {
    Improving,
    Stable,
    Worsening,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleTrend {
    pub current: i32,
    /// Change since the most recent prior measurement.
    pub change_from_previous: i32,
    /// Change since the earliest retained measurement.
    pub change_from_baseline: i32,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TraitDrift {
    pub baseline_percentile: f64,
    pub current_percentile: f64,
    pub drift: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LongitudinalSummary {
    pub snapshots_considered: usize,
    pub first_taken_at: jiff::Timestamp,
    pub last_taken_at: jiff::Timestamp,
    pub clinical: BTreeMap<Subscale, SubscaleTrend>,
    pub traits: BTreeMap<Trait, TraitDrift>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Dichotomy {
    ExtraversionIntroversion,
    IntuitionSensing,
    FeelingThinking,
    JudgingPerceiving,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DichotomyCheck {
    pub dichotomy: Dichotomy,
    pub trait_name: Trait,
    pub percentile: f64,
    pub agrees: bool,
}

/// How well a self-reported MBTI code agrees with the Big Five profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TypologyConsistency {
    pub mbti: String,
    pub checks: Vec<DichotomyCheck>,
    /// Fraction of checks that agree, 0–1.
    pub agreement: f64,
}

/// The full engine output for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Analysis {
    pub model_version: u32,
    pub completeness: CompletenessGrade,
    pub percentiles: BTreeMap<Trait, NormalizedTrait>,
    pub composites: CompositeIndices,
    pub predicted: PredictedDistress,
    pub mechanisms: MechanismAnalysis,
    pub development: DevelopmentalReadiness,
    pub motivation: MotivationalProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub clinical: Option<ClinicalSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub trends: Option<LongitudinalSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub typology: Option<TypologyConsistency>,
}

impl Analysis {
    /// Capture what a later feedback record needs from this result.
    pub fn prior_prediction(&self, predicted_at: jiff::Timestamp) -> PriorPrediction {
        PriorPrediction {
            predicted: self.predicted,
            composites: self.composites,
            model_version: self.model_version,
            predicted_at,
        }
    }
}
