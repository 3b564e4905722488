//! psymap-core
//!
//! Pure domain types for psychometric risk/resilience analysis. No scoring
//! logic lives here. These types are shared by the engine, the feedback
//! log, and the command-line front end.

pub mod error;
pub mod models;
