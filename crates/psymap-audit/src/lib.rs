//! psymap-audit
//!
//! Persistence and offline review of prediction feedback. Sinks store
//! records produced by the engine and emit a structured audit event for
//! each; [`summarize`] reports calibration across a log.

pub mod error;
pub mod events;
pub mod sink;
pub mod summary;

pub use error::AuditError;
pub use events::FeedbackEvent;
pub use sink::{FeedbackSink, JsonlFeedbackLog, MemoryFeedbackLog};
pub use summary::{CalibrationSummary, summarize};
