use thiserror::Error;

/// Rejections raised while validating caller-supplied inputs.
///
/// Any of these means "no analysis available": the engine never produces a
/// partial result once one of them is raised.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("invalid raw score for {field}: {value} is outside [{min}, {max}]")]
    InvalidRawScore {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("missing required input: {0}")]
    MissingRequiredInput(String),

    #[error("invalid MBTI type: {0:?}")]
    InvalidMbtiType(String),

    #[error("unknown trait: {0:?}")]
    UnknownTrait(String),
}
