use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormError {
    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("unknown subscale '{subscale_id}' for instrument '{instrument_id}'")]
    UnknownSubscale {
        instrument_id: String,
        subscale_id: String,
    },

    #[error("no reference norm for trait '{0}'")]
    MissingNorm(String),

    #[error("invalid norm for '{subscale_id}': sd must be positive and finite, got {sd}")]
    InvalidNorm { subscale_id: String, sd: f64 },

    #[error("invalid reference distribution (mean {mean}, sd {sd}): {reason}")]
    InvalidDistribution { mean: f64, sd: f64, reason: String },
}
