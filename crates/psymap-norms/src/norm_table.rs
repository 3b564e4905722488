use std::collections::BTreeMap;

use psymap_core::models::traits::Trait;

use crate::Instrument;
use crate::error::NormError;
use crate::scoring::Norm;

/// Reference distributions keyed by subscale id.
///
/// Read-only after construction; shared freely across analysis calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormTable {
    norms: BTreeMap<String, Norm>,
}

impl NormTable {
    /// Norms from every registered instrument that carries them.
    pub fn standard() -> Self {
        Self::from_instruments(&crate::all_instruments())
    }

    pub fn from_instruments(instruments: &[Box<dyn Instrument>]) -> Self {
        let norms = instruments
            .iter()
            .flat_map(|i| i.subscales())
            .filter_map(|s| s.norm.map(|n| (s.id.clone(), n)))
            .collect();
        Self { norms }
    }

    /// Add or replace one norm. The SD must be positive and finite.
    pub fn insert(&mut self, subscale_id: impl Into<String>, norm: Norm) -> Result<(), NormError> {
        let subscale_id = subscale_id.into();
        if !(norm.sd.is_finite() && norm.sd > 0.0 && norm.mean.is_finite()) {
            return Err(NormError::InvalidNorm {
                subscale_id,
                sd: norm.sd,
            });
        }
        self.norms.insert(subscale_id, norm);
        Ok(())
    }

    pub fn get(&self, t: Trait) -> Option<&Norm> {
        self.norms.get(t.id())
    }

    pub fn percentile(&self, t: Trait, raw: f64) -> Result<f64, NormError> {
        self.get(t)
            .ok_or_else(|| NormError::MissingNorm(t.id().to_string()))?
            .percentile(raw)
    }

    /// Fail on the first trait without a usable norm.
    pub fn ensure_covers(&self, traits: impl IntoIterator<Item = Trait>) -> Result<(), NormError> {
        for t in traits {
            let norm = self
                .get(t)
                .ok_or_else(|| NormError::MissingNorm(t.id().to_string()))?;
            if !(norm.sd.is_finite() && norm.sd > 0.0) {
                return Err(NormError::InvalidNorm {
                    subscale_id: t.id().to_string(),
                    sd: norm.sd,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.norms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.norms.is_empty()
    }
}
