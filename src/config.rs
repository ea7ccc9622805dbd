//! Runtime configuration.
//!
//! Settings are layered: built-in defaults, then a TOML file (`$DOCSEARCH_CONFIG`
//! or `./docsearch.toml`), then `DOCSEARCH_*` environment variables, then the
//! first command-line argument as the index path.

use crate::error::Result;
use crate::search::{DEFAULT_LIMIT, DEFAULT_SNIPPET_CHARS, FieldWeights, SearchOptions};
use crate::record::Category;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `DOCSEARCH_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "docsearch.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Generated `search_index.js`, or a built docs directory containing one
    pub index_path: Option<PathBuf>,
    /// Results returned when a query doesn't ask for a specific count
    pub default_limit: usize,
    /// Upper bound on any requested result count
    pub max_limit: usize,
    /// Character budget for snippets
    pub snippet_chars: usize,
    /// Emit JSON log lines instead of compact text
    pub log_json: bool,
    pub weights: FieldWeights,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_path: None,
            default_limit: DEFAULT_LIMIT,
            max_limit: 100,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            log_json: false,
            weights: FieldWeights::default(),
        }
    }
}

impl Config {
    /// Resolves the full configuration for the server process.
    pub fn load(cli_index_path: Option<String>) -> Result<Self> {
        let file = std::env::var_os("DOCSEARCH_CONFIG")
            .map(PathBuf::from)
            .or_else(|| {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                local.is_file().then_some(local)
            });

        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if let Some(path) = cli_index_path {
            config.index_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.snippet_chars == 0 {
            anyhow::bail!("snippet_chars must be at least 1");
        }
        Ok(())
    }

    /// Overrides fields from `DOCSEARCH_*` variables provided by `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(path) = lookup("DOCSEARCH_INDEX") {
            self.index_path = Some(PathBuf::from(path));
        }
        if let Some(limit) = lookup("DOCSEARCH_LIMIT") {
            self.default_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("DOCSEARCH_LIMIT must be a number, got '{}'", limit))?;
        }
        if let Some(chars) = lookup("DOCSEARCH_SNIPPET_CHARS") {
            self.snippet_chars = chars.trim().parse().with_context(|| {
                format!("DOCSEARCH_SNIPPET_CHARS must be a number, got '{}'", chars)
            })?;
        }
        if let Some(json) = lookup("DOCSEARCH_LOG_JSON") {
            self.log_json = matches!(json.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        self.validate()
            .context("DOCSEARCH_SNIPPET_CHARS must be a positive number")
    }

    /// Index path with `~` expanded.
    pub fn index_path(&self) -> Option<PathBuf> {
        self.index_path
            .as_deref()
            .map(|path| PathBuf::from(expand_tilde(&path.to_string_lossy()).into_owned()))
    }

    /// Query options for a request, applying the default and maximum limits.
    ///
    /// A requested limit of zero is raised to one.
    pub fn search_options(
        &self,
        limit: Option<usize>,
        categories: Option<Vec<Category>>,
    ) -> SearchOptions {
        SearchOptions {
            limit: limit.unwrap_or(self.default_limit).min(self.max_limit).max(1),
            categories,
            snippet_chars: self.snippet_chars,
            weights: self.weights,
        }
    }
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        check!(config.default_limit == 20);
        check!(config.snippet_chars == 160);
        check!(config.index_path.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Config::from_toml(
            r#"
            index_path = "docs/build/search_index.js"
            default_limit = 5

            [weights]
            title = 4.0
            "#,
        )
        .unwrap();
        check!(config.index_path == Some(PathBuf::from("docs/build/search_index.js")));
        check!(config.default_limit == 5);
        check!(config.weights.title == 4.0);
        check!(config.weights.text == 1.0);
        check!(config.snippet_chars == 160);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        check!(Config::from_toml("limitt = 5").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("DOCSEARCH_INDEX", "/srv/docs"),
                ("DOCSEARCH_LIMIT", "7"),
                ("DOCSEARCH_LOG_JSON", "true"),
            ]))
            .unwrap();
        check!(config.index_path == Some(PathBuf::from("/srv/docs")));
        check!(config.default_limit == 7);
        check!(config.log_json);
    }

    #[test]
    fn test_env_invalid_number() {
        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("DOCSEARCH_SNIPPET_CHARS", "wide")]))
            .unwrap_err();
        check!(err.to_string().contains("DOCSEARCH_SNIPPET_CHARS"));
    }

    #[test]
    fn test_search_options_clamp() {
        let config = Config {
            max_limit: 10,
            ..Config::default()
        };
        check!(config.search_options(Some(500), None).limit == 10);
        check!(config.search_options(None, None).limit == 10);
        check!(config.search_options(Some(3), None).limit == 3);
        check!(config.search_options(Some(0), None).limit == 1);
    }

    #[test]
    fn test_zero_snippet_budget_rejected() {
        check!(Config::from_toml("snippet_chars = 0").is_err());

        let mut config = Config::default();
        let err = config
            .apply_env(env(&[("DOCSEARCH_SNIPPET_CHARS", "0")]))
            .unwrap_err();
        check!(err.to_string().contains("DOCSEARCH_SNIPPET_CHARS"));
    }

    #[test]
    fn test_expand_tilde_passthrough() {
        check!(expand_tilde("/abs/path") == "/abs/path");
        check!(expand_tilde("relative/~") == "relative/~");
    }
}
