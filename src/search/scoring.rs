//! Relevance scoring for matched postings.
//!
//! A candidate's score is the sum, over each query token it contains, of
//! `weight(field) * ln(1 + term_frequency)` for every field the token occurs in.
//! The weights are a tunable policy rather than a fixed contract.

use crate::record::Field;
use serde::Deserialize;

/// Per-field multipliers applied to a posting's dampened term frequency.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldWeights {
    pub title: f64,
    pub category: f64,
    pub text: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 3.0,
            category: 2.0,
            text: 1.0,
        }
    }
}

impl FieldWeights {
    pub const fn weight(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title,
            Field::Category => self.category,
            Field::Text => self.text,
        }
    }

    /// Score contribution of one posting.
    ///
    /// The logarithm keeps a field that repeats a token many times from
    /// drowning out a single title hit.
    pub fn posting_score(&self, field: Field, term_frequency: u32) -> f64 {
        self.weight(field) * f64::from(term_frequency).ln_1p()
    }
}
