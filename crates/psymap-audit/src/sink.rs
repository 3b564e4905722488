use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use psymap_core::models::feedback::PredictionFeedbackRecord;

use crate::error::AuditError;
use crate::events::FeedbackEvent;

/// Destination for immutable feedback records.
///
/// The engine never writes to a sink; callers persist what
/// `record_feedback` returns.
pub trait FeedbackSink {
    fn append(&mut self, record: &PredictionFeedbackRecord) -> Result<(), AuditError>;
}

/// Append-only JSON Lines file, one record per line.
#[derive(Debug, Clone)]
pub struct JsonlFeedbackLog {
    path: PathBuf,
}

impl JsonlFeedbackLog {
    /// No I/O happens until the first append or read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record in file order. A missing file is an empty log.
    pub fn read_all(&self) -> Result<Vec<PredictionFeedbackRecord>, AuditError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no feedback log yet");
            return Ok(Vec::new());
        }

        let reader = BufReader::new(std::fs::File::open(&self.path)?);
        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: PredictionFeedbackRecord = serde_json::from_str(&line).map_err(|source| AuditError::Corrupt {
                line: index + 1,
                source,
            })?;
            records.push(record);
        }

        tracing::debug!(path = %self.path.display(), count = records.len(), "feedback log read");
        Ok(records)
    }
}

impl FeedbackSink for JsonlFeedbackLog {
    fn append(&mut self, record: &PredictionFeedbackRecord) -> Result<(), AuditError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Serialize before opening so a failure leaves the file untouched.
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        FeedbackEvent::recorded(record)
            .with_details(serde_json::json!({
                "sink": "jsonl",
                "path": self.path.display().to_string(),
            }))
            .emit();
        Ok(())
    }
}

/// In-process sink, for tests and embedding hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeedbackLog {
    records: Vec<PredictionFeedbackRecord>,
}

impl MemoryFeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[PredictionFeedbackRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<PredictionFeedbackRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FeedbackSink for MemoryFeedbackLog {
    fn append(&mut self, record: &PredictionFeedbackRecord) -> Result<(), AuditError> {
        self.records.push(record.clone());
        FeedbackEvent::recorded(record).emit();
        Ok(())
    }
}
