use std::collections::BTreeMap;

use psymap_core::models::analysis::{ClinicalSection, Mechanism, RiskFactor};
use psymap_core::models::clinical::{ClinicalSnapshot, PredictedDistress, SeverityBand, Subscale};
use psymap_norms::instruments::dass21::Dass21;

/// Severity at or above which a subscale counts as elevated.
const ELEVATED_AT: SeverityBand = SeverityBand::Moderate;

/// Severity bands, prediction gaps, and risk factors for a measured snapshot.
pub fn assess(
    actual: &ClinicalSnapshot,
    predicted: &PredictedDistress,
    active: &[Mechanism],
) -> ClinicalSection {
    let severity: BTreeMap<Subscale, SeverityBand> = Subscale::ALL
        .into_iter()
        .map(|s| (s, Dass21::severity(s, f64::from(actual.get(s)))))
        .collect();

    let prediction_gap = Subscale::ALL
        .into_iter()
        .map(|s| (s, f64::from(actual.get(s)) - predicted.get(s)))
        .collect();

    let risk_factors = active
        .iter()
        .filter_map(|m| {
            let subscale = m.contribution.dominant()?;
            let band = severity.get(&subscale).copied()?;
            (band >= ELEVATED_AT).then(|| RiskFactor {
                mechanism: m.id.clone(),
                pathway: m.pathway.clone(),
                subscale,
                severity: band,
            })
        })
        .collect();

    let elevated = severity.values().any(|band| *band >= ELEVATED_AT);

    ClinicalSection {
        severity,
        prediction_gap,
        risk_factors,
        elevated,
    }
}
