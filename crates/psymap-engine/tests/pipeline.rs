mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{analyze, baseline, big_five, close, engine, high_risk, population_mean};
use psymap_core::error::InputError;
use psymap_core::models::analysis::{CompletenessGrade, ZpdTier};
use psymap_core::models::clinical::{ClinicalSnapshot, Subscale};
use psymap_core::models::input::{AnalysisInput, HistoricalSnapshot};
use psymap_core::models::traits::{Trait, TraitBundle};
use psymap_engine::composite::{NEUTRAL, compute_composites};
use psymap_engine::development::{estimate_sdt, estimate_zpd};
use psymap_engine::predict::predict;
use psymap_engine::{Engine, EngineError, ModelParameters};

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Engine>();
}

#[test]
fn population_mean_profile_sits_at_neutral() {
    let analysis = analyze(population_mean());

    for n in analysis.percentiles.values() {
        assert!(close(n.percentile, 50.0, 1e-4), "{}: {}", n.name, n.percentile);
    }
    assert!(close(analysis.composites.vulnerability, 50.0, 1e-4));
    assert!(close(analysis.composites.resilience, 50.0, 1e-4));
    assert!(close(analysis.predicted.depression, 4.5, 1e-4));
    assert!(close(analysis.predicted.anxiety, 7.5, 1e-4));
    assert!(close(analysis.predicted.stress, 7.5, 1e-4));
    assert!(analysis.mechanisms.active.is_empty());
}

#[test]
fn baseline_profile_matches_reference_values() {
    let analysis = analyze(baseline());

    let p = |t: Trait| analysis.percentiles[&t].percentile;
    assert!(close(p(Trait::Neuroticism), 46.76, 0.01));
    assert!(close(p(Trait::Conscientiousness), 26.88, 0.01));
    assert!(close(p(Trait::Extraversion), 39.06, 0.01));
    assert!(close(p(Trait::Agreeableness), 18.70, 0.01));
    assert!(close(p(Trait::Openness), 8.17, 0.01));

    assert!(close(analysis.composites.vulnerability, 62.12, 0.01));
    assert!(close(analysis.composites.resilience, 42.01, 0.01));
    assert!(close(analysis.predicted.depression, 7.41, 0.01));
    assert!(close(analysis.predicted.anxiety, 9.47, 0.01));
    assert!(close(analysis.predicted.stress, 10.46, 0.01));

    let ids: Vec<&str> = analysis.mechanisms.active.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "low_conscientiousness_disorganization",
            "low_agreeableness_interpersonal_conflict"
        ]
    );
}

#[test]
fn raw_values_are_preserved_alongside_percentiles() {
    let analysis = analyze(baseline().with(Trait::Hope, 4.2));
    let hope = analysis.percentiles[&Trait::Hope];
    assert_eq!(hope.name, Trait::Hope);
    assert_eq!(hope.raw_value, 4.2);
    assert!(hope.percentile > 50.0);
}

#[test]
fn percentile_rises_with_raw_score() {
    let low = analyze(big_five(2.0, 3.0, 3.0, 3.0, 3.0));
    let high = analyze(big_five(4.0, 3.0, 3.0, 3.0, 3.0));
    assert!(
        high.percentiles[&Trait::Neuroticism].percentile
            > low.percentiles[&Trait::Neuroticism].percentile
    );
    assert!(high.composites.vulnerability > low.composites.vulnerability);
    assert!(high.composites.resilience < low.composites.resilience);
}

#[test]
fn outputs_stay_bounded_at_the_extremes() {
    let profiles = [
        big_five(5.0, 1.0, 1.0, 1.0, 1.0),
        big_five(1.0, 5.0, 5.0, 5.0, 5.0),
        high_risk(),
        Trait::all().fold(TraitBundle::new(), |b, t| b.with(t, 5.0)),
        Trait::all().fold(TraitBundle::new(), |b, t| b.with(t, 1.0)),
    ];

    for bundle in profiles {
        let analysis = analyze(bundle);
        for n in analysis.percentiles.values() {
            assert!((0.0..=100.0).contains(&n.percentile));
        }
        assert!((0.0..=100.0).contains(&analysis.composites.vulnerability));
        assert!((0.0..=100.0).contains(&analysis.composites.resilience));
        for s in Subscale::ALL {
            assert!((0.0..=42.0).contains(&analysis.predicted.get(s)));
            assert!(analysis.mechanisms.residual.get(s) >= 0.0);
        }
        for m in &analysis.mechanisms.active {
            assert!((0.0..=1.0).contains(&m.strength), "{}: {}", m.id, m.strength);
        }
        assert!((0.0..=100.0).contains(&analysis.development.capacity));
        assert!((0.0..=100.0).contains(&analysis.motivation.autonomy));
        assert!((0.0..=100.0).contains(&analysis.motivation.competence));
        assert!((0.0..=100.0).contains(&analysis.motivation.relatedness));
    }
}

#[test]
fn identical_input_serializes_identically() {
    let input = AnalysisInput::new(high_risk().with(Trait::SelfRegulation, 5.0))
        .with_clinical(ClinicalSnapshot::new(20, 12, 10));
    let engine = engine();

    let first = serde_json::to_string(&engine.analyze(&input).unwrap()).unwrap();
    let second = serde_json::to_string(&engine.analyze(&input).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn shared_engine_gives_same_result_on_every_thread() {
    let engine = Arc::new(engine());
    let input = AnalysisInput::new(baseline().with(Trait::Zest, 4.5));
    let expected = engine.analyze(&input).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let input = input.clone();
            std::thread::spawn(move || engine.analyze(&input).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn big_five_only_degrades_to_minimal() {
    let analysis = analyze(baseline());
    assert_eq!(analysis.completeness, CompletenessGrade::Minimal);
    assert!(analysis.clinical.is_none());
    assert!(analysis.trends.is_none());
    assert!(analysis.typology.is_none());
    assert_eq!(analysis.model_version, 1);
}

#[test]
fn single_big_five_trait_still_analyzes() {
    let analysis = analyze(TraitBundle::new().with(Trait::Neuroticism, 4.5));
    assert_eq!(analysis.completeness, CompletenessGrade::Minimal);
    assert_eq!(analysis.percentiles.len(), 1);
    assert!(analysis.composites.vulnerability > 50.0);
    assert!(analysis.composites.resilience < 50.0);
}

#[test]
fn high_risk_profile_without_buffers() {
    let base = analyze(baseline());
    let analysis = analyze(high_risk());

    assert!(analysis.composites.vulnerability >= 75.0);
    assert!(
        analysis
            .mechanisms
            .active
            .iter()
            .any(|m| m.id.contains("neuroticism"))
    );
    assert!(analysis.mechanisms.compensations.is_empty());
    for s in Subscale::ALL {
        assert!(analysis.predicted.get(s) > base.predicted.get(s), "{s:?}");
    }
}

#[test]
fn self_regulation_buffers_the_high_risk_profile() {
    let unbuffered = analyze(high_risk());
    let buffered = analyze(high_risk().with(Trait::SelfRegulation, 5.0));

    assert!(!buffered.mechanisms.compensations.is_empty());
    assert!(
        buffered
            .mechanisms
            .compensations
            .iter()
            .all(|c| c.strength_label == "very strong")
    );
    assert!(
        Subscale::ALL.iter().any(|s| {
            buffered.mechanisms.residual.get(*s) < unbuffered.mechanisms.residual.get(*s)
        })
    );
    assert!(close(buffered.mechanisms.residual.stress, 3.186, 0.01));
    assert!(close(unbuffered.mechanisms.residual.stress, 6.356, 0.01));
}

#[test]
fn out_of_range_trait_scores_are_rejected() {
    let engine = engine();
    for raw in [0.0, 5.5, f64::NAN] {
        let input = AnalysisInput::new(baseline().with(Trait::Openness, raw));
        let err = engine.analyze(&input).unwrap_err();
        assert!(err.is_input_error());
        assert!(
            matches!(
                &err,
                EngineError::Input(InputError::InvalidRawScore { field, .. }) if field == "openness"
            ),
            "{raw}: {err}"
        );
    }
}

#[test]
fn negative_clinical_score_is_rejected() {
    let input = AnalysisInput::new(baseline()).with_clinical(ClinicalSnapshot::new(-1, 4, 4));
    let err = engine().analyze(&input).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Input(InputError::InvalidRawScore { ref field, value, .. })
            if field == "depression" && value == -1.0
    ));
}

#[test]
fn clinical_score_above_scale_is_rejected() {
    let input = AnalysisInput::new(baseline()).with_clinical(ClinicalSnapshot::new(4, 43, 4));
    assert!(matches!(
        engine().analyze(&input),
        Err(EngineError::Input(InputError::InvalidRawScore { .. }))
    ));
}

#[test]
fn invalid_history_is_rejected_before_scoring() {
    let input = AnalysisInput::new(baseline()).with_history(vec![HistoricalSnapshot {
        taken_at: common::ts("2026-01-01T00:00:00Z"),
        traits: Some(TraitBundle::new().with(Trait::Hope, 6.0)),
        clinical: None,
    }]);
    assert!(matches!(
        engine().analyze(&input),
        Err(EngineError::Input(InputError::InvalidRawScore { .. }))
    ));
}

#[test]
fn missing_big_five_is_rejected() {
    let input = AnalysisInput::new(TraitBundle::new().with(Trait::Hope, 4.0));
    let err = engine().analyze(&input).unwrap_err();
    assert!(matches!(err, EngineError::Input(InputError::MissingRequiredInput(_))));
}

#[test]
fn range_errors_win_over_missing_big_five() {
    let input = AnalysisInput::new(TraitBundle::new().with(Trait::Hope, 9.0));
    assert!(matches!(
        engine().analyze(&input),
        Err(EngineError::Input(InputError::InvalidRawScore { .. }))
    ));
}

#[test]
fn analysis_serializes_with_snake_case_keys() {
    let input = AnalysisInput::new(baseline()).with_clinical(ClinicalSnapshot::new(10, 8, 12));
    let json = serde_json::to_value(engine().analyze(&input).unwrap()).unwrap();

    assert_eq!(json["completeness"], "partial");
    assert!(json["percentiles"]["neuroticism"]["percentile"].is_number());
    assert!(json["mechanisms"]["residual"]["interpretation"].is_string());
    assert!(json["clinical"]["severity"]["depression"].is_string());
    assert!(json.get("trends").is_none());
}

#[test]
fn input_round_trips_through_json() {
    let json = r#"{
        "traits": {
            "scores": { "neuroticism": 4.0, "conscientiousness": 2.5, "hope": 3.5 },
            "mbti": "infp-t"
        },
        "clinical": { "depression": 14, "anxiety": 8, "stress": 20 }
    }"#;
    let input: AnalysisInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.traits.scores.len(), 3);
    assert_eq!(input.traits.mbti.map(|m| m.code()), Some("INFP".to_string()));
    assert!(input.history.is_empty());

    let analysis = engine().analyze(&input).unwrap();
    assert_eq!(analysis.completeness, CompletenessGrade::Partial);
}

#[test]
fn empty_percentile_map_falls_back_to_neutral_values() {
    let params = ModelParameters::default();
    let empty = BTreeMap::new();

    let composites = compute_composites(&empty, &params.composites);
    assert_eq!(composites.vulnerability, NEUTRAL);
    assert_eq!(composites.resilience, 50.0);

    // Intercepts plus the composite terms at the midpoint.
    let predicted = predict(&empty, &composites, &params.predictive);
    assert!(close(predicted.depression, 6.0, 1e-12));
    assert!(close(predicted.anxiety, 5.5, 1e-12));
    assert!(close(predicted.stress, 8.5, 1e-12));

    let zpd = estimate_zpd(&empty, &params.development);
    assert_eq!(zpd.capacity, 50.0);
    assert_eq!(zpd.tier, ZpdTier::Balanced);
    assert_eq!(zpd.level, 2);

    let sdt = estimate_sdt(&empty, &params.motivation);
    assert_eq!((sdt.autonomy, sdt.competence, sdt.relatedness), (50.0, 50.0, 50.0));
}
