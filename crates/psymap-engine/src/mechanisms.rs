//! Attribution of predicted distress to knowledge-base pathways.
//!
//! Three passes over the rule tables:
//!
//! 1. every mechanism rule whose conditions all hold becomes active, with a
//!    strength equal to the mean condition intensity;
//! 2. every compensation rule whose protector clears its threshold offsets a
//!    share of an active mechanism's contribution;
//! 3. per subscale, contributions and offsets are scaled together when they
//!    would explain more than was predicted, and the remainder is residual.
//!
//! After the third pass `residual + Σ contribution − Σ offset = predicted`
//! holds for each subscale.

use std::collections::BTreeMap;

use psymap_core::models::analysis::{Compensation, Mechanism, MechanismAnalysis, ResidualDistress};
use psymap_core::models::clinical::{PredictedDistress, Subscale, SubscaleContribution};
use psymap_core::models::traits::{NormalizedTrait, Trait};

use crate::knowledge::{Comparison, KnowledgeBase, intensity};
use crate::params::ResidualBands;

/// Below this a prediction counts as zero when forming residual shares.
const PREDICTION_EPSILON: f64 = 1e-9;

pub fn analyze_mechanisms(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    predicted: &PredictedDistress,
    knowledge: &KnowledgeBase,
    bands: &ResidualBands,
) -> MechanismAnalysis {
    let mut active = activate(normalized, knowledge);
    let mut compensations = compensate(normalized, knowledge, &active);

    for subscale in Subscale::ALL {
        let explained = explained(&active, &compensations, subscale);
        let target = predicted.get(subscale);

        if explained > target && explained > 0.0 {
            let factor = target / explained;
            for m in &mut active {
                scale_slot(&mut m.contribution, subscale, factor);
            }
            for c in &mut compensations {
                scale_slot(&mut c.offset, subscale, factor);
            }
        }
    }

    let residual = PredictedDistress::from_fn(|subscale| {
        (predicted.get(subscale) - explained(&active, &compensations, subscale)).max(0.0)
    });

    MechanismAnalysis {
        compensations,
        active,
        residual: ResidualDistress {
            depression: residual.depression,
            anxiety: residual.anxiety,
            stress: residual.stress,
            interpretation: interpret(predicted, &residual, bands),
        },
    }
}

fn explained(active: &[Mechanism], compensations: &[Compensation], subscale: Subscale) -> f64 {
    let contributed: f64 = active.iter().map(|m| m.contribution.get(subscale)).sum();
    let offset: f64 = compensations.iter().map(|c| c.offset.get(subscale)).sum();
    contributed - offset
}

fn scale_slot(amount: &mut SubscaleContribution, subscale: Subscale, factor: f64) {
    if let Some(value) = amount.slot(subscale) {
        amount.set(subscale, value * factor);
    }
}

fn activate(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    knowledge: &KnowledgeBase,
) -> Vec<Mechanism> {
    knowledge
        .mechanisms
        .iter()
        .filter_map(|rule| {
            let intensities: Vec<f64> = rule
                .conditions
                .iter()
                .map(|c| c.evaluate(normalized))
                .collect::<Option<_>>()?;
            let strength = intensities.iter().sum::<f64>() / intensities.len() as f64;
            Some(Mechanism {
                id: rule.id.clone(),
                pathway: rule.pathway.clone(),
                strength,
                contribution: rule.max_contribution.scaled(strength),
            })
        })
        .collect()
}

fn compensate(
    normalized: &BTreeMap<Trait, NormalizedTrait>,
    knowledge: &KnowledgeBase,
    active: &[Mechanism],
) -> Vec<Compensation> {
    // Contribution not yet offset, per active mechanism. Several protectors
    // may buffer one mechanism; together they never offset more than it
    // contributes.
    let mut remaining: BTreeMap<&str, (SubscaleContribution, SubscaleContribution)> = active
        .iter()
        .map(|m| (m.id.as_str(), (m.contribution, m.contribution)))
        .collect();

    let mut compensations = Vec::new();
    for rule in &knowledge.compensations {
        let Some(protector) = normalized.get(&rule.protector) else {
            continue;
        };
        if protector.percentile < rule.threshold {
            continue;
        }
        let Some((contribution, left)) = remaining.get_mut(rule.buffers.as_str()) else {
            continue;
        };

        let share = rule.buffer_fraction
            * intensity(protector.percentile, Comparison::AtLeast, rule.threshold);
        let mut offset = SubscaleContribution::default();
        for subscale in Subscale::ALL {
            if let Some(available) = left.slot(subscale) {
                let value = (share * contribution.get(subscale)).min(available);
                offset.set(subscale, value);
                left.set(subscale, available - value);
            }
        }

        compensations.push(Compensation {
            id: rule.id.clone(),
            condition: rule.condition.clone(),
            mechanism: rule.mechanism.clone(),
            strength_label: strength_label(protector.percentile).to_string(),
            percentile: protector.percentile,
            buffers: rule.buffers.clone(),
            offset,
        });
    }
    compensations
}

/// Label for a protective trait's percentile.
pub fn strength_label(percentile: f64) -> &'static str {
    if percentile < 85.0 {
        "moderate"
    } else if percentile < 95.0 {
        "strong"
    } else {
        "very strong"
    }
}

fn interpret(predicted: &PredictedDistress, residual: &PredictedDistress, bands: &ResidualBands) -> String {
    let largest = Subscale::ALL
        .into_iter()
        .filter(|s| predicted.get(*s) > PREDICTION_EPSILON)
        .map(|s| (s, residual.get(s) / predicted.get(s)))
        .fold(None, |best: Option<(Subscale, f64)>, (s, share)| match best {
            Some((_, b)) if b >= share => best,
            _ => Some((s, share)),
        });

    let Some((subscale, share)) = largest else {
        return "No distress is predicted for this profile, so there is nothing left to explain."
            .to_string();
    };

    let name = subscale.name().to_lowercase();
    let pct = (share * 100.0).round();
    if share < bands.near_zero_below {
        "The identified mechanisms account for nearly all of the predicted distress.".to_string()
    } else if share < bands.moderate_below {
        format!(
            "The identified mechanisms explain most of the predicted distress; about {pct}% of \
             predicted {name} remains unexplained and may reflect situational factors."
        )
    } else {
        format!(
            "About {pct}% of predicted {name} is not explained by the identified mechanisms; \
             situational or unmeasured factors likely play a substantial role."
        )
    }
}
