//! Full-text search over documentation records.
//!
//! This module provides the build-then-query pipeline: tokenization, a one-shot
//! inverted index build, field-weighted ranking and snippet extraction.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod snippet;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{IndexStats, InvertedIndex, Posting, RecordId, RecordStore, SearchIndex};
pub use query::{DEFAULT_LIMIT, SearchOptions, SearchResult};
pub use scoring::FieldWeights;
pub use snippet::DEFAULT_SNIPPET_CHARS;
pub use tokenize::tokenize;
