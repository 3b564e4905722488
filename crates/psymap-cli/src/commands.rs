use std::path::Path;

use eyre::{Result, eyre};
use psymap_audit::{FeedbackSink, JsonlFeedbackLog, summarize};
use psymap_core::models::clinical::ClinicalSnapshot;
use psymap_core::models::feedback::PriorPrediction;
use psymap_core::models::input::AnalysisInput;
use psymap_engine::{Engine, ModelParameters};
use psymap_norms::error::NormError;
use psymap_norms::scoring::ScoreEntry;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cli::{AnalyzeArgs, CalibrationArgs, FeedbackArgs, ParamsArgs, ValidateArgs};

pub(crate) fn analyze(args: AnalyzeArgs) -> Result<()> {
    let engine = Engine::new(load_params(args.params.as_deref())?)?;
    let input: AnalysisInput = read_json(&args.input)?;

    let analysis = engine.analyze(&input)?;
    tracing::info!(
        completeness = ?analysis.completeness,
        active = analysis.mechanisms.active.len(),
        "analysis complete"
    );

    if let Some(path) = &args.prediction_out {
        let prior = analysis.prior_prediction(jiff::Timestamp::now());
        write_json(path, &prior)?;
        tracing::info!(path = %path.display(), "prediction saved for feedback");
    }

    print_json(&analysis, args.pretty)
}

pub(crate) fn feedback(args: FeedbackArgs) -> Result<()> {
    let engine = Engine::new(load_params(args.params.as_deref())?)?;
    let prior: PriorPrediction = read_json(&args.prediction)?;
    let actual: ClinicalSnapshot = read_json(&args.actual)?;

    if prior.model_version != engine.model_version() {
        tracing::warn!(
            prediction = prior.model_version,
            current = engine.model_version(),
            "prediction was made by a different model version"
        );
    }

    let record = engine.record_feedback(
        &prior,
        actual,
        &args.user,
        uuid::Uuid::new_v4(),
        jiff::Timestamp::now(),
    )?;

    let mut log = JsonlFeedbackLog::new(&args.log);
    log.append(&record)?;

    print_json(&record, args.pretty)
}

pub(crate) fn calibration(args: CalibrationArgs) -> Result<()> {
    let records = JsonlFeedbackLog::new(&args.log).read_all()?;
    if records.is_empty() {
        tracing::warn!(path = %args.log.display(), "feedback log is empty");
    }
    print_json(&summarize(&records), args.pretty)
}

pub(crate) fn params(args: ParamsArgs) -> Result<()> {
    let params = ModelParameters::default();
    if !args.write {
        println!("{}", params.to_json_pretty()?);
        return Ok(());
    }

    let path = match args.path {
        Some(path) => path,
        None => ModelParameters::default_path()
            .ok_or_else(|| eyre!("no config directory found; pass --path"))?,
    };
    params.save(&path)?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) fn instruments() -> Result<()> {
    for instrument in psymap_norms::all_instruments() {
        println!("{} ({})", instrument.name(), instrument.id());
        for domain in instrument.domains() {
            let ids: Vec<&str> = domain.subscales.iter().map(|s| s.id.as_str()).collect();
            println!("  {}: {}", domain.name, ids.join(", "));
        }
    }
    Ok(())
}

pub(crate) fn validate(args: ValidateArgs) -> Result<()> {
    let instrument = psymap_norms::get_instrument(&args.instrument)
        .ok_or_else(|| NormError::UnknownInstrument(args.instrument.clone()))?;
    let scores: Vec<ScoreEntry> = read_json(&args.scores)?;

    if let Some(unknown) = instrument.unknown_subscales(&scores).first() {
        return Err(NormError::UnknownSubscale {
            instrument_id: instrument.id().to_string(),
            subscale_id: unknown.to_string(),
        }
        .into());
    }

    let errors = instrument.validate_scores(&scores);
    for error in &errors {
        println!("{error}");
    }
    if !errors.is_empty() {
        return Err(eyre!("{} of {} scores are out of range", errors.len(), scores.len()));
    }

    tracing::info!(instrument = instrument.id(), count = scores.len(), "all scores in range");
    Ok(())
}

/// Explicit path, else the config-directory copy when present, else built-ins.
fn load_params(explicit: Option<&Path>) -> Result<ModelParameters> {
    if let Some(path) = explicit {
        return ModelParameters::load(path)
            .map_err(|e| eyre!("failed to load parameters from {}: {e}", path.display()));
    }
    match ModelParameters::default_path() {
        Some(path) if path.exists() => ModelParameters::load(&path)
            .map_err(|e| eyre!("failed to load parameters from {}: {e}", path.display())),
        _ => Ok(ModelParameters::default()),
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| eyre!("failed to parse {}: {e}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json.as_bytes())
        .map_err(|e| eyre!("failed to write {}: {e}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}
