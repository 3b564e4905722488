use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("feedback log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A line of a JSON Lines log that does not parse as a record.
    #[error("corrupt feedback log entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        source: serde_json::Error,
    },
}
