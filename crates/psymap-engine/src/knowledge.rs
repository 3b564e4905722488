//! Trait→symptom pathway rules and the protective factors that buffer them.
//!
//! Both tables are plain data evaluated uniformly by [`crate::mechanisms`].
//! Adding a pathway means adding a row here, not a branch there.

use std::collections::{BTreeMap, BTreeSet};

use psymap_core::models::clinical::{Subscale, SubscaleContribution};
use psymap_core::models::traits::{NormalizedTrait, Trait};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
}

/// A percentile test on one trait.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "trait")]
    pub trait_name: Trait,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl Condition {
    pub const fn at_least(trait_name: Trait, threshold: f64) -> Self {
        Self {
            trait_name,
            comparison: Comparison::AtLeast,
            threshold,
        }
    }

    pub const fn at_most(trait_name: Trait, threshold: f64) -> Self {
        Self {
            trait_name,
            comparison: Comparison::AtMost,
            threshold,
        }
    }

    /// Intensity in [0.5, 1] when the condition holds, `None` when it does not
    /// or the trait was not measured.
    pub fn evaluate(&self, normalized: &BTreeMap<Trait, NormalizedTrait>) -> Option<f64> {
        let percentile = normalized.get(&self.trait_name)?.percentile;
        let holds = match self.comparison {
            Comparison::AtLeast => percentile >= self.threshold,
            Comparison::AtMost => percentile <= self.threshold,
        };
        holds.then(|| intensity(percentile, self.comparison, self.threshold))
    }

    pub fn describe(&self) -> String {
        let op = match self.comparison {
            Comparison::AtLeast => "≥",
            Comparison::AtMost => "≤",
        };
        format!("{} {op} {}th percentile", self.trait_name.name(), self.threshold)
    }
}

/// How far past its threshold a percentile sits: 0.5 on the threshold,
/// rising linearly to 1.0 at the end of the scale.
pub fn intensity(percentile: f64, comparison: Comparison, threshold: f64) -> f64 {
    let (distance, headroom) = match comparison {
        Comparison::AtLeast => (percentile - threshold, 100.0 - threshold),
        Comparison::AtMost => (threshold - percentile, threshold),
    };
    if headroom <= 0.0 {
        return 1.0;
    }
    0.5 + 0.5 * (distance / headroom).clamp(0.0, 1.0)
}

/// A trait pattern that, when present, drives predicted distress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanismRule {
    pub id: String,
    pub pathway: String,
    /// All must hold for the rule to fire.
    pub conditions: Vec<Condition>,
    /// DASS points attributed at full strength.
    pub max_contribution: SubscaleContribution,
}

/// A protective trait that offsets one mechanism while both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRule {
    pub id: String,
    pub protector: Trait,
    pub threshold: f64,
    /// Id of the mechanism this rule buffers.
    pub buffers: String,
    pub condition: String,
    pub mechanism: String,
    /// Share of the buffered contribution offset at full intensity, (0, 1].
    pub buffer_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub mechanisms: Vec<MechanismRule>,
    pub compensations: Vec<CompensationRule>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::standard()
    }
}

impl KnowledgeBase {
    pub fn mechanism(&self, id: &str) -> Option<&MechanismRule> {
        self.mechanisms.iter().find(|m| m.id == id)
    }

    /// Reject malformed tables. Called once when the engine is built.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.mechanisms.is_empty() {
            return Err(config("knowledge base has no mechanism rules"));
        }

        let mut mechanism_ids = BTreeSet::new();
        for rule in &self.mechanisms {
            if rule.id.trim().is_empty() {
                return Err(config("mechanism rule with an empty id"));
            }
            if !mechanism_ids.insert(rule.id.as_str()) {
                return Err(config(format!("duplicate mechanism id '{}'", rule.id)));
            }
            if rule.pathway.trim().is_empty() {
                return Err(config(format!("mechanism '{}' has no pathway text", rule.id)));
            }
            if rule.conditions.is_empty() {
                return Err(config(format!("mechanism '{}' has no conditions", rule.id)));
            }
            for condition in &rule.conditions {
                check_percentile(&rule.id, condition.threshold)?;
            }
            if rule.max_contribution.is_empty() {
                return Err(config(format!("mechanism '{}' contributes to no subscale", rule.id)));
            }
            for subscale in Subscale::ALL {
                if let Some(points) = rule.max_contribution.slot(subscale)
                    && !(points.is_finite() && points > 0.0)
                {
                    return Err(config(format!(
                        "mechanism '{}' has a non-positive {} contribution ({points})",
                        rule.id,
                        subscale.id()
                    )));
                }
            }
        }

        let mut compensation_ids = BTreeSet::new();
        for rule in &self.compensations {
            if rule.id.trim().is_empty() {
                return Err(config("compensation rule with an empty id"));
            }
            if !compensation_ids.insert(rule.id.as_str()) {
                return Err(config(format!("duplicate compensation id '{}'", rule.id)));
            }
            check_percentile(&rule.id, rule.threshold)?;
            if !mechanism_ids.contains(rule.buffers.as_str()) {
                return Err(config(format!(
                    "compensation '{}' buffers unknown mechanism '{}'",
                    rule.id, rule.buffers
                )));
            }
            if !(rule.buffer_fraction > 0.0 && rule.buffer_fraction <= 1.0) {
                return Err(config(format!(
                    "compensation '{}' buffer fraction {} is outside (0, 1]",
                    rule.id, rule.buffer_fraction
                )));
            }
            if rule.condition.trim().is_empty() || rule.mechanism.trim().is_empty() {
                return Err(config(format!("compensation '{}' is missing description text", rule.id)));
            }
        }

        Ok(())
    }

    /// The built-in rule tables shipped as model version 1.
    pub fn standard() -> Self {
        use Trait::*;

        let mechanisms = vec![
            rule(
                "neuroticism_negative_affect",
                "High negative emotionality amplifies threat appraisal and rumination",
                vec![Condition::at_least(Neuroticism, 70.0)],
                [Some(3.0), Some(5.0), Some(4.0)],
            ),
            rule(
                "introversion_low_positive_affect",
                "Low positive affect and social withdrawal reduce exposure to rewarding experiences",
                vec![Condition::at_most(Extraversion, 30.0)],
                [Some(4.0), None, None],
            ),
            rule(
                "low_conscientiousness_disorganization",
                "Weak planning and follow-through let demands accumulate into chronic pressure",
                vec![Condition::at_most(Conscientiousness, 30.0)],
                [Some(1.0), None, Some(3.0)],
            ),
            rule(
                "neuroticism_low_conscientiousness_stress_generation",
                "Emotional reactivity without structure generates new stressors (stress generation)",
                vec![
                    Condition::at_least(Neuroticism, 70.0),
                    Condition::at_most(Conscientiousness, 30.0),
                ],
                [Some(1.0), Some(1.0), Some(3.0)],
            ),
            rule(
                "neuroticism_introversion_withdrawal",
                "Distress combined with low sociability leads to isolation and loss of support",
                vec![
                    Condition::at_least(Neuroticism, 70.0),
                    Condition::at_most(Extraversion, 30.0),
                ],
                [Some(3.0), Some(2.0), None],
            ),
            rule(
                "low_agreeableness_interpersonal_conflict",
                "Antagonistic interpersonal style produces recurring conflict",
                vec![Condition::at_most(Agreeableness, 20.0)],
                [Some(1.0), None, Some(2.0)],
            ),
            rule(
                "agreeable_neuroticism_self_silencing",
                "Strong need for harmony with high sensitivity leads to suppressed needs and self-blame",
                vec![
                    Condition::at_least(Agreeableness, 75.0),
                    Condition::at_least(Neuroticism, 65.0),
                ],
                [Some(2.0), Some(2.0), None],
            ),
            rule(
                "rigid_neuroticism_intolerance_of_uncertainty",
                "Preference for the familiar with high sensitivity turns ambiguity into worry",
                vec![
                    Condition::at_most(Openness, 20.0),
                    Condition::at_least(Neuroticism, 60.0),
                ],
                [None, Some(2.0), Some(1.0)],
            ),
            rule(
                "maladaptive_perfectionism",
                "Very high standards paired with fear of failure produce performance anxiety",
                vec![
                    Condition::at_least(Conscientiousness, 85.0),
                    Condition::at_least(Neuroticism, 65.0),
                ],
                [None, Some(3.0), Some(3.0)],
            ),
        ];

        let compensations = vec![
            compensation(
                "self_regulation_steadies_stress_generation",
                SelfRegulation,
                "neuroticism_low_conscientiousness_stress_generation",
                "High self-regulation alongside emotional reactivity and low structure",
                "Deliberate impulse and routine control interrupts the stress-generation cycle",
                0.6,
            ),
            compensation(
                "self_regulation_tempers_negative_affect",
                SelfRegulation,
                "neuroticism_negative_affect",
                "High self-regulation alongside high negative emotionality",
                "Emotion-regulation skill shortens rumination and threat responses",
                0.35,
            ),
            compensation(
                "hope_counters_low_positive_affect",
                Hope,
                "introversion_low_positive_affect",
                "High hope alongside low positive affect",
                "Goal-directed optimism sustains motivation when social reward is scarce",
                0.5,
            ),
            compensation(
                "zest_counters_withdrawal",
                Zest,
                "neuroticism_introversion_withdrawal",
                "High zest alongside distress-driven withdrawal",
                "Energy and enthusiasm keep activity levels up despite withdrawal pressure",
                0.4,
            ),
            compensation(
                "love_counters_withdrawal",
                Love,
                "neuroticism_introversion_withdrawal",
                "Strong close relationships alongside distress-driven withdrawal",
                "A few close bonds preserve support even with low general sociability",
                0.3,
            ),
            compensation(
                "perseverance_offsets_disorganization",
                Perseverance,
                "low_conscientiousness_disorganization",
                "High perseverance alongside low conscientiousness",
                "Persistence on chosen goals limits the backlog that disorganization creates",
                0.5,
            ),
            compensation(
                "gratitude_tempers_negative_affect",
                Gratitude,
                "neuroticism_negative_affect",
                "High gratitude alongside high negative emotionality",
                "Attention to positive experience counterbalances negative appraisal",
                0.3,
            ),
            compensation(
                "social_intelligence_defuses_conflict",
                SocialIntelligence,
                "low_agreeableness_interpersonal_conflict",
                "High social intelligence alongside an antagonistic style",
                "Reading others accurately keeps disagreements from escalating",
                0.4,
            ),
            compensation(
                "perspective_relaxes_perfectionism",
                Perspective,
                "maladaptive_perfectionism",
                "High perspective alongside perfectionistic standards",
                "Seeing the bigger picture loosens all-or-nothing evaluation of performance",
                0.4,
            ),
            compensation(
                "conscientiousness_structures_negative_affect",
                Conscientiousness,
                "neuroticism_negative_affect",
                "High conscientiousness alongside high negative emotionality",
                "Structure and planning contain the practical fallout of strong emotions",
                0.25,
            ),
        ];

        Self {
            mechanisms,
            compensations,
        }
    }
}

/// Default threshold for every built-in protective factor.
const PROTECTIVE_THRESHOLD: f64 = 80.0;

fn rule(
    id: &str,
    pathway: &str,
    conditions: Vec<Condition>,
    [depression, anxiety, stress]: [Option<f64>; 3],
) -> MechanismRule {
    MechanismRule {
        id: id.to_string(),
        pathway: pathway.to_string(),
        conditions,
        max_contribution: SubscaleContribution {
            depression,
            anxiety,
            stress,
        },
    }
}

fn compensation(
    id: &str,
    protector: Trait,
    buffers: &str,
    condition: &str,
    mechanism: &str,
    buffer_fraction: f64,
) -> CompensationRule {
    CompensationRule {
        id: id.to_string(),
        protector,
        threshold: PROTECTIVE_THRESHOLD,
        buffers: buffers.to_string(),
        condition: condition.to_string(),
        mechanism: mechanism.to_string(),
        buffer_fraction,
    }
}

fn check_percentile(rule_id: &str, threshold: f64) -> Result<(), EngineError> {
    if threshold.is_finite() && (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(config(format!(
            "rule '{rule_id}' threshold {threshold} is outside [0, 100]"
        )))
    }
}

fn config(message: impl Into<String>) -> EngineError {
    EngineError::KnowledgeBaseConfiguration(message.into())
}
