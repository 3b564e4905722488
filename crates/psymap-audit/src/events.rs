use psymap_core::models::feedback::PredictionFeedbackRecord;
use serde::Serialize;
use tracing::info;

/// A structured audit event for calibration bookkeeping.
///
/// Logged via `tracing` so it lands wherever the host routes its logs. The
/// record itself goes to a [`crate::FeedbackSink`]; this event only says
/// that it happened.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackEvent {
    pub action: String,
    pub record_id: String,
    pub user_ref: String,
    pub segment_tag: String,
    pub model_version: u32,
    pub mae: f64,
    pub details: Option<serde_json::Value>,
}

impl FeedbackEvent {
    pub fn new(action: impl Into<String>, record: &PredictionFeedbackRecord) -> Self {
        Self {
            action: action.into(),
            record_id: record.id.to_string(),
            user_ref: record.user_ref.clone(),
            segment_tag: record.segment_tag.clone(),
            model_version: record.model_version,
            mae: record.mae,
            details: None,
        }
    }

    pub fn recorded(record: &PredictionFeedbackRecord) -> Self {
        Self::new("feedback.recorded", record)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        info!(
            audit.action = %self.action,
            audit.record_id = %self.record_id,
            audit.user_ref = %self.user_ref,
            audit.segment_tag = %self.segment_tag,
            audit.model_version = self.model_version,
            audit.mae = self.mae,
            audit.details = ?self.details,
            "audit event"
        );
    }
}
