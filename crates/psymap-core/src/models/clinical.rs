use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::InputError;

/// Maximum per-subscale score on the DASS-21 ×2 (DASS-42 equivalent) scale.
pub const CLINICAL_MAX: i32 = 42;
/// Maximum raw item sum per DASS-21 subscale (7 items × 3).
pub const RAW_SUBSCALE_MAX: i32 = 21;

/// The three DASS-21 distress subscales.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Subscale {
    Depression,
    Anxiety,
    Stress,
}

impl Subscale {
    pub const ALL: [Subscale; 3] = [Subscale::Depression, Subscale::Anxiety, Subscale::Stress];

    pub fn id(&self) -> &'static str {
        match self {
            Subscale::Depression => "depression",
            Subscale::Anxiety => "anxiety",
            Subscale::Stress => "stress",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Subscale::Depression => "Depression",
            Subscale::Anxiety => "Anxiety",
            Subscale::Stress => "Stress",
        }
    }
}

/// A measured DASS-21 result on the 0–42 scale.
///
/// Fields are signed so that out-of-range submissions (including negative
/// values) reach validation instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClinicalSnapshot {
    pub depression: i32,
    pub anxiety: i32,
    pub stress: i32,
}

impl ClinicalSnapshot {
    pub fn new(depression: i32, anxiety: i32, stress: i32) -> Self {
        Self {
            depression,
            anxiety,
            stress,
        }
    }

    /// Build from raw 0–21 item sums, doubling onto the 0–42 scale.
    pub fn from_raw_sums(depression: i32, anxiety: i32, stress: i32) -> Result<Self, InputError> {
        for (subscale, value) in Subscale::ALL.into_iter().zip([depression, anxiety, stress]) {
            check_range(subscale, value, RAW_SUBSCALE_MAX)?;
        }
        Ok(Self::new(depression * 2, anxiety * 2, stress * 2))
    }

    pub fn get(&self, subscale: Subscale) -> i32 {
        match subscale {
            Subscale::Depression => self.depression,
            Subscale::Anxiety => self.anxiety,
            Subscale::Stress => self.stress,
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        for subscale in Subscale::ALL {
            check_range(subscale, self.get(subscale), CLINICAL_MAX)?;
        }
        Ok(())
    }
}

fn check_range(subscale: Subscale, value: i32, max: i32) -> Result<(), InputError> {
    if (0..=max).contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidRawScore {
            field: subscale.id().to_string(),
            value: f64::from(value),
            min: 0.0,
            max: f64::from(max),
        })
    }
}

/// Predicted DASS-21 scores, each clamped to [0, [`CLINICAL_MAX`]].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PredictedDistress {
    pub depression: f64,
    pub anxiety: f64,
    pub stress: f64,
}

impl PredictedDistress {
    pub fn new(depression: f64, anxiety: f64, stress: f64) -> Self {
        Self {
            depression,
            anxiety,
            stress,
        }
    }

    /// Build by evaluating `f` once per subscale.
    pub fn from_fn(mut f: impl FnMut(Subscale) -> f64) -> Self {
        Self {
            depression: f(Subscale::Depression),
            anxiety: f(Subscale::Anxiety),
            stress: f(Subscale::Stress),
        }
    }

    pub fn get(&self, subscale: Subscale) -> f64 {
        match subscale {
            Subscale::Depression => self.depression,
            Subscale::Anxiety => self.anxiety,
            Subscale::Stress => self.stress,
        }
    }

    /// Every subscale finite and within [0, [`CLINICAL_MAX`]].
    pub fn validate(&self) -> Result<(), InputError> {
        let max = f64::from(CLINICAL_MAX);
        for subscale in Subscale::ALL {
            let value = self.get(subscale);
            if !(value.is_finite() && (0.0..=max).contains(&value)) {
                return Err(InputError::InvalidRawScore {
                    field: format!("predicted {}", subscale.id()),
                    value,
                    min: 0.0,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// A partial per-subscale amount: mechanism contributions, compensation
/// offsets, and rule maxima all use this shape. Absent subscales count as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubscaleContribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub depression: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anxiety: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub stress: Option<f64>,
}

impl SubscaleContribution {
    pub fn get(&self, subscale: Subscale) -> f64 {
        self.slot(subscale).unwrap_or(0.0)
    }

    pub fn slot(&self, subscale: Subscale) -> Option<f64> {
        match subscale {
            Subscale::Depression => self.depression,
            Subscale::Anxiety => self.anxiety,
            Subscale::Stress => self.stress,
        }
    }

    pub fn set(&mut self, subscale: Subscale, value: f64) {
        let slot = match subscale {
            Subscale::Depression => &mut self.depression,
            Subscale::Anxiety => &mut self.anxiety,
            Subscale::Stress => &mut self.stress,
        };
        *slot = Some(value);
    }

    /// Multiply every present part by `factor`, keeping absent parts absent.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            depression: self.depression.map(|v| v * factor),
            anxiety: self.anxiety.map(|v| v * factor),
            stress: self.stress.map(|v| v * factor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.depression.is_none() && self.anxiety.is_none() && self.stress.is_none()
    }

    /// The subscale with the largest present part, first in declaration
    /// order on ties.
    pub fn dominant(&self) -> Option<Subscale> {
        Subscale::ALL
            .into_iter()
            .filter_map(|s| self.slot(s).map(|v| (s, v)))
            .fold(None, |best: Option<(Subscale, f64)>, (s, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((s, v)),
            })
            .map(|(s, _)| s)
    }
}

/// DASS-21 severity band.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityBand {
    Normal,
    Mild,
    Moderate,
    Severe,
    ExtremelySevere,
}
