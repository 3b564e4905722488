mod common;

use common::{baseline, close, engine, ts};
use psymap_core::models::analysis::TrendDirection;
use psymap_core::models::clinical::{ClinicalSnapshot, Subscale};
use psymap_core::models::input::{AnalysisInput, HistoricalSnapshot};
use psymap_core::models::traits::{Trait, TraitBundle};
use psymap_engine::{Engine, ModelParameters};

fn snapshot(at: &str, clinical: (i32, i32, i32), neuroticism: Option<f64>) -> HistoricalSnapshot {
    HistoricalSnapshot {
        taken_at: ts(at),
        traits: neuroticism.map(|n| TraitBundle::new().with(Trait::Neuroticism, n)),
        clinical: Some(ClinicalSnapshot::new(clinical.0, clinical.1, clinical.2)),
    }
}

/// Three prior measurements, deliberately out of order.
fn history() -> Vec<HistoricalSnapshot> {
    vec![
        snapshot("2026-01-01T00:00:00Z", (20, 10, 18), Some(4.5)),
        snapshot("2026-03-01T00:00:00Z", (16, 10, 14), None),
        snapshot("2026-02-01T00:00:00Z", (18, 12, 16), Some(4.0)),
    ]
}

fn input() -> AnalysisInput {
    AnalysisInput::new(baseline())
        .with_clinical(ClinicalSnapshot::new(12, 9, 15))
        .with_history(history())
}

#[test]
fn no_history_means_no_trends() {
    let analysis = engine().analyze(&AnalysisInput::new(baseline())).unwrap();
    assert!(analysis.trends.is_none());
}

#[test]
fn trends_run_oldest_to_current() {
    let analysis = engine().analyze(&input()).unwrap();
    let trends = analysis.trends.expect("history supplied");

    assert_eq!(trends.snapshots_considered, 3);
    assert_eq!(trends.first_taken_at, ts("2026-01-01T00:00:00Z"));
    assert_eq!(trends.last_taken_at, ts("2026-03-01T00:00:00Z"));

    let depression = trends.clinical[&Subscale::Depression];
    assert_eq!(depression.current, 12);
    assert_eq!(depression.change_from_previous, -4);
    assert_eq!(depression.change_from_baseline, -8);
    assert_eq!(depression.direction, TrendDirection::Improving);

    let anxiety = trends.clinical[&Subscale::Anxiety];
    assert_eq!(anxiety.change_from_previous, -1);
    assert_eq!(anxiety.change_from_baseline, -1);
    assert_eq!(anxiety.direction, TrendDirection::Stable);

    // A change of exactly the stable band is not stable.
    let stress = trends.clinical[&Subscale::Stress];
    assert_eq!(stress.change_from_previous, 1);
    assert_eq!(stress.change_from_baseline, -3);
    assert_eq!(stress.direction, TrendDirection::Improving);
}

#[test]
fn trait_drift_compares_current_profile_with_earliest_snapshot() {
    let engine = engine();
    let analysis = engine.analyze(&input()).unwrap();
    let trends = analysis.trends.unwrap();

    let drift = trends.traits[&Trait::Neuroticism];
    let baseline_percentile = engine
        .norms()
        .percentile(Trait::Neuroticism, 4.5)
        .unwrap();
    assert!(close(drift.baseline_percentile, baseline_percentile, 1e-12));
    assert!(close(
        drift.current_percentile,
        analysis.percentiles[&Trait::Neuroticism].percentile,
        1e-12
    ));
    assert!(drift.drift < 0.0);
    assert_eq!(trends.traits.len(), 1);
}

#[test]
fn history_is_capped_to_the_most_recent_snapshots() {
    let mut params = ModelParameters::default();
    params.longitudinal.history_limit = 2;
    let engine = Engine::new(params).unwrap();

    let trends = engine.analyze(&input()).unwrap().trends.unwrap();
    assert_eq!(trends.snapshots_considered, 2);
    assert_eq!(trends.first_taken_at, ts("2026-02-01T00:00:00Z"));
    assert_eq!(trends.clinical[&Subscale::Depression].change_from_baseline, -6);

    let drift = trends.traits[&Trait::Neuroticism];
    let expected = engine.norms().percentile(Trait::Neuroticism, 4.0).unwrap();
    assert!(close(drift.baseline_percentile, expected, 1e-12));
}

#[test]
fn history_without_current_clinical_trends_between_snapshots() {
    let input = AnalysisInput::new(baseline()).with_history(history());
    let trends = engine().analyze(&input).unwrap().trends.unwrap();

    // Series is 20 → 18 → 16.
    let depression = trends.clinical[&Subscale::Depression];
    assert_eq!(depression.current, 16);
    assert_eq!(depression.change_from_previous, -2);
    assert_eq!(depression.change_from_baseline, -4);
}

#[test]
fn single_measurement_yields_no_clinical_trend() {
    let input = AnalysisInput::new(baseline()).with_history(vec![snapshot(
        "2026-01-01T00:00:00Z",
        (10, 10, 10),
        None,
    )]);
    let trends = engine().analyze(&input).unwrap().trends.unwrap();
    assert_eq!(trends.snapshots_considered, 1);
    assert!(trends.clinical.is_empty());
    assert!(trends.traits.is_empty());
}

#[test]
fn invalid_history_clinical_is_rejected() {
    let input = AnalysisInput::new(baseline()).with_history(vec![snapshot(
        "2026-01-01T00:00:00Z",
        (10, -2, 10),
        None,
    )]);
    let err = engine().analyze(&input).unwrap_err();
    assert!(err.is_input_error());
}
