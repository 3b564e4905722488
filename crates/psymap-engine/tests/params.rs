use psymap_core::models::traits::Trait;
use psymap_engine::knowledge::{CompensationRule, Condition};
use psymap_engine::params::FORMAT_VERSION;
use psymap_engine::{Engine, EngineError, ModelParameters};
use psymap_norms::NormTable;

fn config_error(params: ModelParameters) -> String {
    match Engine::new(params) {
        Err(EngineError::KnowledgeBaseConfiguration(message)) => message,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("engine accepted invalid parameters"),
    }
}

#[test]
fn defaults_are_valid_model_version_one() {
    let params = ModelParameters::default();
    params.validate().unwrap();
    assert_eq!(params.model_version, 1);
    assert_eq!(params.format_version, FORMAT_VERSION);
    assert_eq!(params.knowledge.mechanisms.len(), 9);
    assert_eq!(params.knowledge.compensations.len(), 10);
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("model.json");

    let mut params = ModelParameters::default();
    params.model_version = 7;
    params.save(&path).unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
    let loaded = ModelParameters::load(&path).unwrap();
    assert_eq!(loaded, params);
}

#[test]
fn pre_versioned_document_is_migrated() {
    let mut json = serde_json::to_value(ModelParameters::default()).unwrap();
    let obj = json.as_object_mut().unwrap();
    obj.remove("format_version");
    obj.remove("residual");
    obj.remove("longitudinal");
    obj.remove("segments");

    let params = ModelParameters::from_json_str(&json.to_string()).unwrap();
    assert_eq!(params.format_version, FORMAT_VERSION);
    assert_eq!(params, ModelParameters::default());
}

#[test]
fn newer_format_is_refused() {
    let mut json = serde_json::to_value(ModelParameters::default()).unwrap();
    json["format_version"] = serde_json::json!(99);

    let err = ModelParameters::from_json_str(&json.to_string()).unwrap_err();
    assert!(matches!(
        err,
        EngineError::UnsupportedFormatVersion {
            found: 99,
            supported: 1
        }
    ));
}

#[test]
fn non_object_document_is_rejected() {
    assert!(matches!(
        ModelParameters::from_json_str("[1, 2, 3]"),
        Err(EngineError::KnowledgeBaseConfiguration(_))
    ));
    assert!(matches!(
        ModelParameters::from_json_str("{ not json"),
        Err(EngineError::Serialization(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelParameters::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
    assert!(!err.is_input_error());
}

#[test]
fn duplicate_mechanism_ids_are_rejected() {
    let mut params = ModelParameters::default();
    let copy = params.knowledge.mechanisms[0].clone();
    params.knowledge.mechanisms.push(copy);
    assert!(config_error(params).contains("duplicate mechanism id"));
}

#[test]
fn compensation_must_buffer_a_known_mechanism() {
    let mut params = ModelParameters::default();
    params.knowledge.compensations.push(CompensationRule {
        id: "humor_lightens_everything".to_string(),
        protector: Trait::Humor,
        threshold: 80.0,
        buffers: "no_such_mechanism".to_string(),
        condition: "High humor".to_string(),
        mechanism: "Levity".to_string(),
        buffer_fraction: 0.2,
    });
    assert!(config_error(params).contains("unknown mechanism"));
}

#[test]
fn buffer_fraction_must_be_a_share() {
    let mut params = ModelParameters::default();
    params.knowledge.compensations[0].buffer_fraction = 1.5;
    assert!(config_error(params).contains("buffer fraction"));
}

#[test]
fn thresholds_must_be_percentiles() {
    let mut params = ModelParameters::default();
    params.knowledge.mechanisms[0].conditions[0] = Condition::at_least(Trait::Neuroticism, 120.0);
    assert!(config_error(params).contains("outside [0, 100]"));
}

#[test]
fn mechanisms_need_conditions_and_positive_maxima() {
    let mut params = ModelParameters::default();
    params.knowledge.mechanisms[0].conditions.clear();
    assert!(config_error(params).contains("no conditions"));

    let mut params = ModelParameters::default();
    params.knowledge.mechanisms[1].max_contribution.depression = Some(-1.0);
    assert!(config_error(params).contains("non-positive"));
}

#[test]
fn motivation_subsets_must_be_disjoint() {
    let mut params = ModelParameters::default();
    params.motivation.competence.insert(Trait::Openness, 0.1);
    assert!(config_error(params).contains("disjoint"));
}

#[test]
fn development_thresholds_must_be_ordered() {
    let mut params = ModelParameters::default();
    params.development.scaffolding_below = 80.0;
    assert!(config_error(params).contains("development thresholds"));
}

#[test]
fn weight_tables_must_be_usable() {
    let mut params = ModelParameters::default();
    params.composites.vulnerability.clear();
    assert!(config_error(params).contains("empty"));

    let mut params = ModelParameters::default();
    params.composites.resilience.insert(Trait::Hope, f64::NAN);
    assert!(config_error(params).contains("non-finite"));

    let mut params = ModelParameters::default();
    params.predictive.stress.intercept = f64::INFINITY;
    assert!(config_error(params).contains("predictive.stress.intercept"));
}

#[test]
fn history_limit_must_be_positive() {
    let mut params = ModelParameters::default();
    params.longitudinal.history_limit = 0;
    assert!(config_error(params).contains("history_limit"));
}

#[test]
fn incomplete_norm_table_fails_at_startup() {
    let err = Engine::with_norms(ModelParameters::default(), NormTable::default()).unwrap_err();
    assert!(matches!(err, EngineError::KnowledgeBaseConfiguration(_)));
}

#[test]
fn referenced_traits_cover_rules_and_weights() {
    let traits = ModelParameters::default().referenced_traits();
    assert!(traits.contains(&Trait::Neuroticism));
    assert!(traits.contains(&Trait::SocialIntelligence));
    assert!(traits.contains(&Trait::Teamwork));
    assert!(!traits.contains(&Trait::Spirituality));
}
