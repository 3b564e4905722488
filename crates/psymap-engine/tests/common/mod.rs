#![allow(dead_code)]

use psymap_core::models::input::AnalysisInput;
use psymap_core::models::traits::{Trait, TraitBundle};
use psymap_engine::Engine;

/// Raw Big Five averages in (N, C, E, A, O) order.
pub fn big_five(n: f64, c: f64, e: f64, a: f64, o: f64) -> TraitBundle {
    TraitBundle::new()
        .with(Trait::Neuroticism, n)
        .with(Trait::Conscientiousness, c)
        .with(Trait::Extraversion, e)
        .with(Trait::Agreeableness, a)
        .with(Trait::Openness, o)
}

/// Every Big Five trait at a raw 3.
pub fn baseline() -> TraitBundle {
    big_five(3.0, 3.0, 3.0, 3.0, 3.0)
}

/// Very high neuroticism, very low conscientiousness and extraversion.
pub fn high_risk() -> TraitBundle {
    big_five(5.0, 1.0, 1.0, 3.0, 3.0)
}

/// Every Big Five trait at its population mean.
pub fn population_mean() -> TraitBundle {
    big_five(3.07, 3.45, 3.25, 3.64, 3.92)
}

pub fn engine() -> Engine {
    Engine::with_defaults().expect("default parameters are valid")
}

pub fn analyze(bundle: TraitBundle) -> psymap_core::models::analysis::Analysis {
    engine()
        .analyze(&AnalysisInput::new(bundle))
        .expect("analysis succeeds")
}

pub fn ts(s: &str) -> jiff::Timestamp {
    s.parse().expect("valid timestamp")
}

pub fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() <= tolerance
}
