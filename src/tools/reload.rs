//! Handler for (re)loading the search index from disk.

use crate::config::expand_tilde;
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReloadRequest {
    /// Path to search_index.js or a built documentation directory (default: the current index)
    #[serde(default)]
    pub path: Option<String>,
}

/// Rebuild the index from scratch and report what changed.
pub async fn handle_reload(state: &IndexState, request: ReloadRequest) -> Result<String, String> {
    let path = request
        .path
        .as_deref()
        .map(|path| PathBuf::from(expand_tilde(path).into_owned()));

    let outcome = state
        .load(path.as_deref())
        .await
        .map_err(|e| format!("Failed to reload index: {:#}", e))?;

    Ok(format!(
        "Loaded {} records ({} unique terms) from {} in {:.1?}.{}",
        outcome.records,
        outcome.terms,
        outcome.path.display(),
        outcome.elapsed,
        if outcome.changed {
            ""
        } else {
            " Contents unchanged since the previous load."
        }
    ))
}
