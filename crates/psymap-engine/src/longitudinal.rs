use std::collections::BTreeMap;

use psymap_core::models::analysis::{LongitudinalSummary, SubscaleTrend, TraitDrift, TrendDirection};
use psymap_core::models::clinical::{ClinicalSnapshot, Subscale};
use psymap_core::models::input::HistoricalSnapshot;
use psymap_core::models::traits::{NormalizedTrait, Trait, TraitFamily};
use psymap_norms::NormTable;

use crate::error::EngineError;
use crate::normalize::normalize;
use crate::params::LongitudinalParameters;

/// Trends across prior measurements, ending at the current one.
///
/// History is sorted oldest first and cut to the most recent
/// `history_limit` snapshots. Each series is the retained history followed
/// by the current value when one was supplied; a series needs two points to
/// yield a trend. Returns `None` when no history was given.
pub fn summarize_history(
    history: &[HistoricalSnapshot],
    current_traits: &BTreeMap<Trait, NormalizedTrait>,
    current_clinical: Option<&ClinicalSnapshot>,
    norms: &NormTable,
    params: &LongitudinalParameters,
) -> Result<Option<LongitudinalSummary>, EngineError> {
    let mut retained: Vec<&HistoricalSnapshot> = history.iter().collect();
    // Stable sort: snapshots sharing a timestamp keep their given order.
    retained.sort_by_key(|s| s.taken_at);
    let skip = retained.len().saturating_sub(params.history_limit);
    let retained = &retained[skip..];

    let (Some(first), Some(last)) = (retained.first(), retained.last()) else {
        return Ok(None);
    };

    let mut clinical = BTreeMap::new();
    for subscale in Subscale::ALL {
        let series: Vec<i32> = retained
            .iter()
            .filter_map(|s| s.clinical.map(|c| c.get(subscale)))
            .chain(current_clinical.map(|c| c.get(subscale)))
            .collect();
        if let Some(trend) = trend(&series, params.stable_band) {
            clinical.insert(subscale, trend);
        }
    }

    let mut baselines: BTreeMap<Trait, f64> = BTreeMap::new();
    let mut latest: BTreeMap<Trait, f64> = BTreeMap::new();
    for snapshot in retained {
        let Some(bundle) = &snapshot.traits else {
            continue;
        };
        for (t, n) in normalize(bundle, norms)? {
            if t.family() != TraitFamily::BigFive {
                continue;
            }
            baselines.entry(t).or_insert(n.percentile);
            latest.insert(t, n.percentile);
        }
    }
    let traits = baselines
        .into_iter()
        .filter_map(|(t, baseline_percentile)| {
            // The current profile wins over the most recent history entry.
            let current_percentile = current_traits
                .get(&t)
                .map(|n| n.percentile)
                .or_else(|| latest.get(&t).copied())?;
            Some((
                t,
                TraitDrift {
                    baseline_percentile,
                    current_percentile,
                    drift: current_percentile - baseline_percentile,
                },
            ))
        })
        .collect();

    tracing::debug!(
        supplied = history.len(),
        retained = retained.len(),
        "history summarized"
    );

    Ok(Some(LongitudinalSummary {
        snapshots_considered: retained.len(),
        first_taken_at: first.taken_at,
        last_taken_at: last.taken_at,
        clinical,
        traits,
    }))
}

fn trend(series: &[i32], stable_band: f64) -> Option<SubscaleTrend> {
    let (&current, earlier) = series.split_last()?;
    let &previous = earlier.last()?;
    let &baseline = earlier.first()?;
    let change_from_baseline = current - baseline;
    let direction = if f64::from(change_from_baseline.abs()) < stable_band {
        TrendDirection::Stable
    } else if change_from_baseline < 0 {
        // Lower DASS scores mean less distress.
        TrendDirection::Improving
    } else {
        TrendDirection::Worsening
    };
    Some(SubscaleTrend {
        current,
        change_from_previous: current - previous,
        change_from_baseline,
        direction,
    })
}
