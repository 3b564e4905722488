use std::collections::BTreeMap;

use psymap_core::models::analysis::{Dichotomy, DichotomyCheck, TypologyConsistency};
use psymap_core::models::mbti::{Attitude, Judging, MbtiType, Orientation, Perceiving};
use psymap_core::models::traits::{NormalizedTrait, Trait};

/// Percentile at or above which a trait reads as the first pole (E, N, F, J).
const POLE_SPLIT: f64 = 50.0;

/// Compare a self-reported MBTI code against the matching Big Five traits.
///
/// Dichotomies whose trait was not measured are skipped; `None` when no
/// dichotomy could be checked.
pub fn check_consistency(
    mbti: &MbtiType,
    normalized: &BTreeMap<Trait, NormalizedTrait>,
) -> Option<TypologyConsistency> {
    let pairs = [
        (
            Dichotomy::ExtraversionIntroversion,
            Trait::Extraversion,
            mbti.attitude == Attitude::Extraversion,
        ),
        (
            Dichotomy::IntuitionSensing,
            Trait::Openness,
            mbti.perceiving == Perceiving::Intuition,
        ),
        (
            Dichotomy::FeelingThinking,
            Trait::Agreeableness,
            mbti.judging == Judging::Feeling,
        ),
        (
            Dichotomy::JudgingPerceiving,
            Trait::Conscientiousness,
            mbti.orientation == Orientation::Judging,
        ),
    ];

    let checks: Vec<DichotomyCheck> = pairs
        .into_iter()
        .filter_map(|(dichotomy, trait_name, first_pole)| {
            let percentile = normalized.get(&trait_name)?.percentile;
            Some(DichotomyCheck {
                dichotomy,
                trait_name,
                percentile,
                agrees: (percentile >= POLE_SPLIT) == first_pole,
            })
        })
        .collect();

    if checks.is_empty() {
        return None;
    }
    let agreement = checks.iter().filter(|c| c.agrees).count() as f64 / checks.len() as f64;
    Some(TypologyConsistency {
        mbti: mbti.code(),
        checks,
        agreement,
    })
}
