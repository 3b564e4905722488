//! psymap-norms
//!
//! Reference instruments and population norms. Pure data with no
//! scoring pipeline. Defines the subscales, valid ranges, reference
//! distributions, and severity cut-offs for each supported questionnaire.

pub mod error;
pub mod instruments;
pub mod norm_table;
pub mod scoring;

use scoring::{Domain, ScoreEntry, Subscale, ValidationError};

pub use norm_table::NormTable;

/// Trait implemented by each psychometric instrument.
pub trait Instrument: Send + Sync {
    /// Unique identifier for this instrument (e.g., "big_five", "dass21").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "Big Five Inventory", "DASS-21").
    fn name(&self) -> &str;

    /// The domains and subscales this instrument measures.
    fn domains(&self) -> &[Domain];

    /// Every subscale across all domains, in declaration order.
    fn subscales(&self) -> Vec<&Subscale> {
        self.domains().iter().flat_map(|d| &d.subscales).collect()
    }

    fn subscale(&self, id: &str) -> Option<&Subscale> {
        self.subscales().into_iter().find(|s| s.id == id)
    }

    /// Check caller-supplied scores against subscale ranges. Entries naming
    /// a subscale this instrument does not have are skipped; see
    /// [`Instrument::unknown_subscales`].
    fn validate_scores(&self, scores: &[ScoreEntry]) -> Vec<ValidationError> {
        scores
            .iter()
            .filter_map(|entry| {
                let subscale = self.subscale(&entry.subscale_id)?;
                (!subscale.range.contains(entry.value)).then(|| ValidationError {
                    subscale_id: entry.subscale_id.clone(),
                    value: entry.value,
                    expected_range: subscale.range,
                    score_type: subscale.score_type,
                    message: format!(
                        "{}: {} score {} is outside range [{}, {}]",
                        self.name(),
                        subscale.name,
                        entry.value,
                        subscale.range.min,
                        subscale.range.max,
                    ),
                })
            })
            .collect()
    }

    fn unknown_subscales<'a>(&self, scores: &'a [ScoreEntry]) -> Vec<&'a str> {
        scores
            .iter()
            .map(|entry| entry.subscale_id.as_str())
            .filter(|id| self.subscale(id).is_none())
            .collect()
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::big_five::BigFiveInventory),
        Box::new(instruments::via::ViaInventory),
        Box::new(instruments::dass21::Dass21),
    ]
}

/// Look up an instrument by ID.
pub fn get_instrument(id: &str) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.id() == id)
}
