use psymap_core::error::InputError;
use psymap_core::models::analysis::Analysis;
use psymap_core::models::clinical::ClinicalSnapshot;
use psymap_core::models::feedback::{PredictionFeedbackRecord, PriorPrediction};
use psymap_core::models::input::AnalysisInput;
use psymap_core::models::traits::Trait;
use psymap_norms::NormTable;
use uuid::Uuid;

use crate::calibration;
use crate::clinical::assess;
use crate::completeness::grade;
use crate::composite::compute_composites;
use crate::development::{estimate_sdt, estimate_zpd};
use crate::error::EngineError;
use crate::longitudinal::summarize_history;
use crate::mechanisms::analyze_mechanisms;
use crate::normalize::normalize;
use crate::params::ModelParameters;
use crate::predict::predict;
use crate::typology::check_consistency;

/// The analysis pipeline over one validated, immutable parameter set.
///
/// Built once, then shared freely (`Arc<Engine>`): `analyze` takes `&self`
/// and performs no I/O.
#[derive(Debug, Clone)]
pub struct Engine {
    params: ModelParameters,
    norms: NormTable,
}

impl Engine {
    /// Validate `params` against the standard norm tables.
    pub fn new(params: ModelParameters) -> Result<Self, EngineError> {
        Self::with_norms(params, NormTable::standard())
    }

    pub fn with_defaults() -> Result<Self, EngineError> {
        Self::new(ModelParameters::default())
    }

    /// Every malformed table surfaces here as
    /// [`EngineError::KnowledgeBaseConfiguration`], never during `analyze`.
    pub fn with_norms(params: ModelParameters, norms: NormTable) -> Result<Self, EngineError> {
        params.validate()?;
        norms.ensure_covers(Trait::all())?;

        tracing::info!(
            model_version = params.model_version,
            mechanisms = params.knowledge.mechanisms.len(),
            compensations = params.knowledge.compensations.len(),
            "engine ready"
        );
        Ok(Self { params, norms })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn norms(&self) -> &NormTable {
        &self.norms
    }

    pub fn model_version(&self) -> u32 {
        self.params.model_version
    }

    /// Run the full pipeline. All inputs are validated before any scoring;
    /// an error means no analysis at all.
    pub fn analyze(&self, input: &AnalysisInput) -> Result<Analysis, EngineError> {
        validate(input)?;

        let completeness = grade(&input.traits, input.clinical.as_ref());
        if !input.traits.has_complete_big_five() {
            tracing::warn!(
                present = input.traits.big_five_count(),
                "incomplete Big Five profile; missing traits pull indices toward neutral"
            );
        }

        let percentiles = normalize(&input.traits, &self.norms)?;
        tracing::debug!(traits = percentiles.len(), ?completeness, "traits normalized");

        let composites = compute_composites(&percentiles, &self.params.composites);
        tracing::debug!(
            vulnerability = composites.vulnerability,
            resilience = composites.resilience,
            "composites computed"
        );

        let predicted = predict(&percentiles, &composites, &self.params.predictive);
        tracing::debug!(
            depression = predicted.depression,
            anxiety = predicted.anxiety,
            stress = predicted.stress,
            "distress predicted"
        );

        let mechanisms = analyze_mechanisms(
            &percentiles,
            &predicted,
            &self.params.knowledge,
            &self.params.residual,
        );
        tracing::debug!(
            active = mechanisms.active.len(),
            compensations = mechanisms.compensations.len(),
            "mechanisms attributed"
        );

        let development = estimate_zpd(&percentiles, &self.params.development);
        let motivation = estimate_sdt(&percentiles, &self.params.motivation);

        let clinical = input
            .clinical
            .as_ref()
            .map(|actual| assess(actual, &predicted, &mechanisms.active));
        let trends = summarize_history(
            &input.history,
            &percentiles,
            input.clinical.as_ref(),
            &self.norms,
            &self.params.longitudinal,
        )?;
        let typology = input
            .traits
            .mbti
            .as_ref()
            .and_then(|mbti| check_consistency(mbti, &percentiles));

        Ok(Analysis {
            model_version: self.params.model_version,
            completeness,
            percentiles,
            composites,
            predicted,
            mechanisms,
            development,
            motivation,
            clinical,
            trends,
            typology,
        })
    }

    /// Compare an earlier prediction with a later measurement, tagging the
    /// record with this engine's segment bands.
    pub fn record_feedback(
        &self,
        prior: &PriorPrediction,
        actual: ClinicalSnapshot,
        user_ref: &str,
        id: Uuid,
        recorded_at: jiff::Timestamp,
    ) -> Result<PredictionFeedbackRecord, EngineError> {
        calibration::record_feedback(prior, actual, user_ref, id, recorded_at, &self.params.segments)
    }
}

/// Range checks on every supplied value first, then the Big Five
/// precondition.
fn validate(input: &AnalysisInput) -> Result<(), InputError> {
    input.traits.validate_ranges()?;
    if let Some(clinical) = &input.clinical {
        clinical.validate()?;
    }
    for snapshot in &input.history {
        if let Some(traits) = &snapshot.traits {
            traits.validate_ranges()?;
        }
        if let Some(clinical) = &snapshot.clinical {
            clinical.validate()?;
        }
    }
    input.traits.validate()
}
