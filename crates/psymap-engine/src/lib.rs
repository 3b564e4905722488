//! psymap-engine
//!
//! Turns a trait bundle into predicted distress, attributed mechanisms,
//! developmental estimates, and calibration records. Deterministic and
//! synchronous; the only I/O is loading and saving [`ModelParameters`].

pub mod calibration;
pub mod clinical;
pub mod completeness;
pub mod composite;
pub mod development;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod longitudinal;
pub mod mechanisms;
pub mod normalize;
pub mod params;
pub mod predict;
pub mod typology;

pub use engine::Engine;
pub use error::EngineError;
pub use knowledge::KnowledgeBase;
pub use params::ModelParameters;
