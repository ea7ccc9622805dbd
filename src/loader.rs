//! Loading generated documentation search indexes from disk.
//!
//! The generator ships its records as a JavaScript assignment,
//! `var documenterSearchIndex = {"docs": [...]}`. We also accept the bare
//! object and a bare array so the same loader works on extracted JSON.

use crate::error::SearchError;
use crate::record::DocRecord;
use ignore::WalkBuilder;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use xxhash_rust::xxh3::xxh3_64;

/// File name the generator writes its search index to.
pub const INDEX_FILE_NAME: &str = "search_index.js";

/// Matches a leading `var name =` (or `let`/`const`) JavaScript assignment.
static JS_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][\w$]*\s*=\s*").unwrap()
});

/// Records read from a search index file, with provenance.
#[derive(Debug, Clone)]
pub struct LoadedCorpus {
    pub path: PathBuf,
    pub records: Vec<DocRecord>,
    /// xxh3 digest of the raw file contents
    pub fingerprint: u64,
}

/// Resolves `path` to a search index file.
///
/// A file path is returned as-is. A directory is walked (hidden and ignored
/// entries included, since built docs often live under ignored `build/` dirs)
/// and the shallowest `search_index.js` wins, ties broken by path order.
pub fn discover(path: &Path) -> Result<PathBuf, SearchError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if !path.is_dir() {
        return Err(SearchError::NotFound(path.to_path_buf()));
    }

    let mut matches: Vec<_> = WalkBuilder::new(path)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_exclude(false)
        .git_global(false)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|e| e.file_name() == INDEX_FILE_NAME)
        .map(|e| (e.depth(), e.into_path()))
        .collect();

    matches.sort();
    matches
        .into_iter()
        .next()
        .map(|(_, path)| path)
        .ok_or_else(|| SearchError::NotFound(path.to_path_buf()))
}

/// Reads and decodes a search index file (or the index found under a directory).
pub fn load(path: &Path) -> Result<LoadedCorpus, SearchError> {
    let path = discover(path)?;
    let content = std::fs::read_to_string(&path).map_err(|source| SearchError::Io {
        path: path.clone(),
        source,
    })?;

    let fingerprint = xxh3_64(content.as_bytes());
    let records = parse_records(&content)?;
    tracing::debug!(
        "Loaded {} records from {} (fingerprint {:016x})",
        records.len(),
        path.display(),
        fingerprint
    );

    Ok(LoadedCorpus {
        path,
        records,
        fingerprint,
    })
}

/// Decodes the contents of a search index file.
pub fn parse_records(content: &str) -> Result<Vec<DocRecord>, SearchError> {
    let body = match JS_ASSIGNMENT.find(content) {
        Some(prefix) => &content[prefix.end()..],
        None => content,
    };
    let body = body.trim_end().trim_end_matches(';');

    let value: Value = serde_json::from_str(body)?;
    records_from_value(value)
}

/// Extracts records from a decoded payload.
///
/// Missing or `null` fields become empty strings; anything that is not a list
/// of objects is [`SearchError::InvalidInput`].
pub fn records_from_value(value: Value) -> Result<Vec<DocRecord>, SearchError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("docs") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SearchError::InvalidInput(format!(
                    "`docs` must be a list of records, found {}",
                    kind(&other)
                )));
            }
            None => {
                return Err(SearchError::InvalidInput(
                    "expected a list of records or an object with a `docs` list".to_string(),
                ));
            }
        },
        other => {
            return Err(SearchError::InvalidInput(format!(
                "expected a list of records, found {}",
                kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            if !item.is_object() {
                return Err(SearchError::InvalidInput(format!(
                    "record {} is {}, not an object",
                    position,
                    kind(&item)
                )));
            }
            serde_json::from_value(item).map_err(|e| {
                SearchError::InvalidInput(format!("record {}: {}", position, e))
            })
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
