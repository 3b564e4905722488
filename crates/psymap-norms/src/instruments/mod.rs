pub mod big_five;
pub mod dass21;
pub mod via;

use crate::scoring::{Norm, ScoreRange, ScoreType, Subscale};

/// Range shared by every 1–5 Likert-mean subscale.
pub(crate) const LIKERT_MEAN: ScoreRange = ScoreRange {
    min: 1.0,
    max: 5.0,
    step: None,
};

pub(crate) fn likert_subscale(id: &str, name: &str, mean: f64, sd: f64) -> Subscale {
    Subscale {
        id: id.to_string(),
        name: name.to_string(),
        score_type: ScoreType::LikertMean,
        range: LIKERT_MEAN,
        norm: Some(Norm::new(mean, sd)),
        cutoffs: None,
        description: None,
    }
}
