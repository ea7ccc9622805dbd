//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for application plumbing (config, state, server).
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced while turning a generated record batch into an index.
///
/// Only structurally invalid input is an error. Sparse records, empty text and
/// unmatched queries are modeled as empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The batch is not a list of records, or an element is not a record object.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The index file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The payload is not valid JSON.
    #[error("malformed search index: {0}")]
    Json(#[from] serde_json::Error),
    /// No generated search index exists under the given directory.
    #[error("no search_index.js found under {}", .0.display())]
    NotFound(PathBuf),
}
