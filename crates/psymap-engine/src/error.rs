use psymap_core::error::InputError;
use psymap_norms::error::NormError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller input rejected before any computation.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Malformed rule, weight, or norm table. Raised when the engine is
    /// built, never per call.
    #[error("knowledge base configuration error: {0}")]
    KnowledgeBaseConfiguration(String),

    #[error("parameter format version {found} is newer than this build supports ({supported})")]
    UnsupportedFormatVersion { found: u32, supported: u32 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NormError> for EngineError {
    fn from(e: NormError) -> Self {
        EngineError::KnowledgeBaseConfiguration(e.to_string())
    }
}

impl EngineError {
    /// Whether this error came from the caller's input rather than the
    /// engine's own configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(self, EngineError::Input(_))
    }
}
