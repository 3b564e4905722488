use psymap_core::models::clinical::SeverityBand;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;
use ts_rs::TS;

use crate::error::NormError;

/// The type of score a subscale produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreType {
    /// Mean of Likert items (1–5).
    LikertMean,
    /// Unscaled item sum.
    Raw,
    /// Item sum multiplied onto a longer form's scale (DASS-21 ×2).
    Scaled,
    /// Percentile rank (0–100).
    Percentile,
}

/// Defines the valid range for a score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// Reference-population mean and standard deviation for a subscale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Norm {
    pub mean: f64,
    pub sd: f64,
}

impl Norm {
    pub const fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }

    pub fn z(&self, raw: f64) -> f64 {
        (raw - self.mean) / self.sd
    }

    pub fn distribution(&self) -> Result<Normal, NormError> {
        Normal::new(self.mean, self.sd).map_err(|e| NormError::InvalidDistribution {
            mean: self.mean,
            sd: self.sd,
            reason: e.to_string(),
        })
    }

    /// Percentile rank of `raw` under a normal reference distribution,
    /// clamped to [0, 100]. Non-decreasing in `raw`.
    pub fn percentile(&self, raw: f64) -> Result<f64, NormError> {
        let cdf = self.distribution()?.cdf(raw);
        Ok((100.0 * cdf).clamp(0.0, 100.0))
    }
}

/// Lower bounds of each non-normal severity band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityCutoffs {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
    pub extremely_severe: f64,
}

impl SeverityCutoffs {
    pub fn classify(&self, score: f64) -> SeverityBand {
        if score >= self.extremely_severe {
            SeverityBand::ExtremelySevere
        } else if score >= self.severe {
            SeverityBand::Severe
        } else if score >= self.moderate {
            SeverityBand::Moderate
        } else if score >= self.mild {
            SeverityBand::Mild
        } else {
            SeverityBand::Normal
        }
    }
}

/// A subscale definition within an instrument.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Subscale {
    pub id: String,
    pub name: String,
    pub score_type: ScoreType,
    pub range: ScoreRange,
    pub norm: Option<Norm>,
    pub cutoffs: Option<SeverityCutoffs>,
    pub description: Option<String>,
}

/// A top-level domain within an instrument, containing subscales.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Domain {
    pub id: String,
    pub name: String,
    pub subscales: Vec<Subscale>,
    pub description: Option<String>,
}

/// A score entry provided by the caller for validation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreEntry {
    pub subscale_id: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub subscale_id: String,
    pub value: f64,
    pub expected_range: ScoreRange,
    pub score_type: ScoreType,
    pub message: String,
}
