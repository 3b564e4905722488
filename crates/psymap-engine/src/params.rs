//! The versioned numeric model: weights, coefficients, thresholds, and the
//! knowledge base, as one swappable JSON document.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use psymap_core::models::clinical::Subscale;
use psymap_core::models::traits::Trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::knowledge::KnowledgeBase;

/// Current document shape. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const FORMAT_VERSION: u32 = 1;

/// Calibration version of the built-in numbers.
pub const DEFAULT_MODEL_VERSION: u32 = 1;

pub type WeightTable = BTreeMap<Trait, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Document shape version. Missing or 0 = pre-versioned document.
    #[serde(default)]
    pub format_version: u32,
    /// Stamped on every analysis and feedback record.
    pub model_version: u32,
    pub composites: CompositeWeights,
    pub predictive: PredictiveModel,
    pub development: DevelopmentParameters,
    pub motivation: MotivationWeights,
    pub residual: ResidualBands,
    pub longitudinal: LongitudinalParameters,
    pub segments: SegmentBands,
    pub knowledge: KnowledgeBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub vulnerability: WeightTable,
    pub resilience: WeightTable,
}

/// `predicted = a + b·V/100 − c·R/100 + Σ d·p/100`, per subscale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscaleModel {
    pub intercept: f64,
    pub vulnerability: f64,
    pub resilience: f64,
    #[serde(default)]
    pub traits: WeightTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictiveModel {
    pub depression: SubscaleModel,
    pub anxiety: SubscaleModel,
    pub stress: SubscaleModel,
}

impl PredictiveModel {
    pub fn get(&self, subscale: Subscale) -> &SubscaleModel {
        match subscale {
            Subscale::Depression => &self.depression,
            Subscale::Anxiety => &self.anxiety,
            Subscale::Stress => &self.stress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentParameters {
    pub capacity: WeightTable,
    /// Capacity below this is tier 1.
    pub scaffolding_below: f64,
    /// Capacity below this (and at or above `scaffolding_below`) is tier 2.
    pub balanced_below: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotivationWeights {
    pub autonomy: WeightTable,
    pub competence: WeightTable,
    pub relatedness: WeightTable,
}

/// Residual share cut-offs for the interpretation text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualBands {
    pub near_zero_below: f64,
    pub moderate_below: f64,
}

impl Default for ResidualBands {
    fn default() -> Self {
        Self {
            near_zero_below: 0.15,
            moderate_below: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongitudinalParameters {
    /// Most recent snapshots retained.
    pub history_limit: usize,
    /// Changes smaller than this (in DASS points) read as stable.
    pub stable_band: f64,
}

impl Default for LongitudinalParameters {
    fn default() -> Self {
        Self {
            history_limit: 10,
            stable_band: 3.0,
        }
    }
}

/// Composite-index bands used in feedback segment tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBands {
    pub low_below: f64,
    pub mid_below: f64,
}

impl Default for SegmentBands {
    fn default() -> Self {
        Self {
            low_below: 40.0,
            mid_below: 60.0,
        }
    }
}

impl SegmentBands {
    pub fn label(&self, index: f64) -> &'static str {
        if index < self.low_below {
            "low"
        } else if index < self.mid_below {
            "mid"
        } else {
            "high"
        }
    }
}

fn table(entries: &[(Trait, f64)]) -> WeightTable {
    entries.iter().copied().collect()
}

impl Default for ModelParameters {
    fn default() -> Self {
        use Trait::*;

        Self {
            format_version: FORMAT_VERSION,
            model_version: DEFAULT_MODEL_VERSION,
            composites: CompositeWeights {
                vulnerability: table(&[
                    (Neuroticism, 0.45),
                    (Conscientiousness, -0.20),
                    (Extraversion, -0.15),
                    (Agreeableness, -0.10),
                    (Openness, -0.10),
                ]),
                resilience: table(&[
                    (Neuroticism, -0.30),
                    (Conscientiousness, 0.20),
                    (Extraversion, 0.15),
                    (Agreeableness, 0.05),
                    (Openness, 0.05),
                    (Hope, 0.08),
                    (Perseverance, 0.06),
                    (SelfRegulation, 0.10),
                    (Zest, 0.05),
                    (Gratitude, 0.04),
                    (Love, 0.04),
                ]),
            },
            predictive: PredictiveModel {
                depression: SubscaleModel {
                    intercept: 2.0,
                    vulnerability: 16.0,
                    resilience: 8.0,
                    traits: table(&[(Extraversion, -3.0), (Hope, -4.0), (Zest, -3.0)]),
                },
                anxiety: SubscaleModel {
                    intercept: 1.0,
                    vulnerability: 14.0,
                    resilience: 5.0,
                    traits: table(&[(Neuroticism, 4.0), (Bravery, -2.0), (SelfRegulation, -2.0)]),
                },
                stress: SubscaleModel {
                    intercept: 4.0,
                    vulnerability: 16.0,
                    resilience: 7.0,
                    traits: table(&[(Conscientiousness, -2.0), (SelfRegulation, -6.0)]),
                },
            },
            development: DevelopmentParameters {
                capacity: table(&[
                    (Conscientiousness, 0.30),
                    (Neuroticism, -0.20),
                    (Openness, 0.15),
                    (SelfRegulation, 0.12),
                    (Perseverance, 0.10),
                    (LoveOfLearning, 0.08),
                    (Curiosity, 0.05),
                ]),
                scaffolding_below: 40.0,
                balanced_below: 70.0,
            },
            motivation: MotivationWeights {
                autonomy: table(&[
                    (Openness, 0.40),
                    (Creativity, 0.20),
                    (Curiosity, 0.20),
                    (Bravery, 0.20),
                ]),
                competence: table(&[
                    (Conscientiousness, 0.45),
                    (Neuroticism, -0.25),
                    (Perseverance, 0.15),
                    (Prudence, 0.15),
                ]),
                relatedness: table(&[
                    (Extraversion, 0.35),
                    (Agreeableness, 0.35),
                    (Love, 0.10),
                    (Kindness, 0.10),
                    (SocialIntelligence, 0.05),
                    (Teamwork, 0.05),
                ]),
            },
            residual: ResidualBands::default(),
            longitudinal: LongitudinalParameters::default(),
            segments: SegmentBands::default(),
            knowledge: KnowledgeBase::standard(),
        }
    }
}

impl ModelParameters {
    /// Default document location: `<config dir>/psymap/model.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("psymap").join("model.json"))
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)?;
        let params = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            model_version = params.model_version,
            "model parameters loaded"
        );
        Ok(params)
    }

    /// Parse a parameter document, migrating older shapes first.
    pub fn from_json_str(contents: &str) -> Result<Self, EngineError> {
        // Parse as raw JSON so migrations run before deserializing.
        let json: serde_json::Value = serde_json::from_str(contents)?;
        let on_disk_version = json
            .get("format_version")
            .and_then(|v| v.as_u64())
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0);

        let migrated = migrate(json, on_disk_version)?;
        Ok(serde_json::from_value(migrated)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, EngineError> {
        let mut stamped = self.clone();
        stamped.format_version = FORMAT_VERSION;
        Ok(serde_json::to_string_pretty(&stamped)?)
    }

    /// Write the document, always stamped with the current format version.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)?;
        }

        let json = self.to_json_pretty()?;

        // Write to a temp file then rename for atomicity
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, json.as_bytes())?;
        std::fs::rename(&tmp_path, path)?;

        tracing::info!(path = %path.display(), "model parameters saved");
        Ok(())
    }

    /// Reject malformed tables. [`crate::Engine::new`] calls this once.
    pub fn validate(&self) -> Result<(), EngineError> {
        check_table("composites.vulnerability", &self.composites.vulnerability)?;
        check_table("composites.resilience", &self.composites.resilience)?;

        for subscale in Subscale::ALL {
            let model = self.predictive.get(subscale);
            for (label, value) in [
                ("intercept", model.intercept),
                ("vulnerability", model.vulnerability),
                ("resilience", model.resilience),
            ] {
                if !value.is_finite() {
                    return Err(config(format!(
                        "predictive.{}.{label} is not finite",
                        subscale.id()
                    )));
                }
            }
            if let Some((t, w)) = model.traits.iter().find(|(_, w)| !w.is_finite()) {
                return Err(config(format!(
                    "predictive.{}.traits has a non-finite weight for {t}: {w}",
                    subscale.id()
                )));
            }
        }

        check_table("development.capacity", &self.development.capacity)?;
        let dev = &self.development;
        if !(dev.scaffolding_below.is_finite()
            && dev.balanced_below.is_finite()
            && 0.0 <= dev.scaffolding_below
            && dev.scaffolding_below < dev.balanced_below
            && dev.balanced_below <= 100.0)
        {
            return Err(config(format!(
                "development thresholds must satisfy 0 ≤ {} < {} ≤ 100",
                dev.scaffolding_below, dev.balanced_below
            )));
        }

        let sdt = [
            ("motivation.autonomy", &self.motivation.autonomy),
            ("motivation.competence", &self.motivation.competence),
            ("motivation.relatedness", &self.motivation.relatedness),
        ];
        let mut claimed: BTreeSet<Trait> = BTreeSet::new();
        for (name, weights) in sdt {
            check_table(name, weights)?;
            for t in weights.keys() {
                if !claimed.insert(*t) {
                    return Err(config(format!(
                        "{name} reuses {t}; motivation trait subsets must be disjoint"
                    )));
                }
            }
        }

        let bands = &self.residual;
        if !(bands.near_zero_below.is_finite()
            && bands.moderate_below.is_finite()
            && 0.0 < bands.near_zero_below
            && bands.near_zero_below < bands.moderate_below)
        {
            return Err(config(format!(
                "residual bands must satisfy 0 < {} < {}",
                bands.near_zero_below, bands.moderate_below
            )));
        }

        if self.longitudinal.history_limit == 0 {
            return Err(config("longitudinal.history_limit must be at least 1"));
        }
        if !(self.longitudinal.stable_band.is_finite() && self.longitudinal.stable_band >= 0.0) {
            return Err(config(format!(
                "longitudinal.stable_band {} must be a non-negative number",
                self.longitudinal.stable_band
            )));
        }

        let seg = &self.segments;
        if !(seg.low_below.is_finite()
            && seg.mid_below.is_finite()
            && seg.low_below < seg.mid_below)
        {
            return Err(config(format!(
                "segment bands must satisfy {} < {}",
                seg.low_below, seg.mid_below
            )));
        }

        self.knowledge.validate()
    }

    /// Every trait referenced anywhere in the model.
    pub fn referenced_traits(&self) -> BTreeSet<Trait> {
        let mut traits = BTreeSet::new();
        let tables = [
            &self.composites.vulnerability,
            &self.composites.resilience,
            &self.predictive.depression.traits,
            &self.predictive.anxiety.traits,
            &self.predictive.stress.traits,
            &self.development.capacity,
            &self.motivation.autonomy,
            &self.motivation.competence,
            &self.motivation.relatedness,
        ];
        for weights in tables {
            traits.extend(weights.keys().copied());
        }
        for rule in &self.knowledge.mechanisms {
            traits.extend(rule.conditions.iter().map(|c| c.trait_name));
        }
        traits.extend(self.knowledge.compensations.iter().map(|c| c.protector));
        traits
    }
}

/// Run sequential migrations from `from_version` up to [`FORMAT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> Result<serde_json::Value, EngineError> {
    if from_version > FORMAT_VERSION {
        return Err(EngineError::UnsupportedFormatVersion {
            found: from_version,
            supported: FORMAT_VERSION,
        });
    }

    // v0 → v1: residual, longitudinal, and segment sections gain defaults
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| config("parameter document is not a JSON object"))?;
        obj.entry("residual")
            .or_insert(serde_json::to_value(ResidualBands::default())?);
        obj.entry("longitudinal")
            .or_insert(serde_json::to_value(LongitudinalParameters::default())?);
        obj.entry("segments")
            .or_insert(serde_json::to_value(SegmentBands::default())?);
        obj.insert(
            "format_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated model parameters v0 → v1 (added residual, longitudinal, segments)");
    }

    Ok(json)
}

fn check_table(name: &str, weights: &WeightTable) -> Result<(), EngineError> {
    if weights.is_empty() {
        return Err(config(format!("weight table {name} is empty")));
    }
    if weights.values().all(|w| *w == 0.0) {
        return Err(config(format!("weight table {name} has only zero weights")));
    }
    if let Some((t, w)) = weights.iter().find(|(_, w)| !w.is_finite()) {
        return Err(config(format!("weight table {name} has a non-finite weight for {t}: {w}")));
    }
    Ok(())
}

fn config(message: impl Into<String>) -> EngineError {
    EngineError::KnowledgeBaseConfiguration(message.into())
}
