//! Shared, reloadable search index state.
//!
//! The index itself is immutable. Reloading builds a complete replacement on
//! the blocking pool and only then swaps the published `Arc`, so queries in
//! flight keep using the old index and no query ever sees a partial build.

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::loader::{self, LoadedCorpus};
use crate::search::SearchIndex;
use anyhow::{Context, anyhow};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::RwLock;

/// Where the current index came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSource {
    pub path: PathBuf,
    /// xxh3 digest of the file the index was built from
    pub fingerprint: u64,
    pub loaded_at: SystemTime,
}

/// Summary of a completed (re)load.
#[derive(Debug, Clone)]
pub struct ReloadOutcome {
    pub path: PathBuf,
    pub records: usize,
    pub terms: usize,
    /// Whether the file contents differ from the previously loaded index
    pub changed: bool,
    pub elapsed: Duration,
}

/// Shared state for the published search index.
pub struct IndexState {
    /// The index queries run against, once one has been built
    index: RwLock<Option<Arc<SearchIndex>>>,

    /// Provenance of `index` when it was loaded from disk
    source: RwLock<Option<IndexSource>>,

    config: Config,
}

impl std::fmt::Debug for IndexState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexState")
            .field(
                "has_index",
                &self.index.try_read().map(|index| index.is_some()).ok(),
            )
            .field("source", &self.source.try_read().ok().and_then(|s| s.clone()))
            .finish_non_exhaustive()
    }
}

impl IndexState {
    pub fn new(config: Config) -> Self {
        Self {
            index: RwLock::new(None),
            source: RwLock::new(None),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The currently published index, if any.
    ///
    /// The lock is released before returning; callers search the `Arc` freely.
    pub async fn current(&self) -> Option<Arc<SearchIndex>> {
        self.index.read().await.clone()
    }

    pub async fn source(&self) -> Option<IndexSource> {
        self.source.read().await.clone()
    }

    /// Publishes an index built elsewhere (e.g. from records already in memory).
    pub async fn publish(&self, index: SearchIndex) {
        *self.index.write().await = Some(Arc::new(index));
        *self.source.write().await = None;
    }

    /// Loads (or reloads) the index from disk and publishes it.
    ///
    /// `path` falls back to the path of the current index, then to the
    /// configured index path. On failure the previous index stays published.
    pub async fn load(&self, path: Option<&Path>) -> Result<ReloadOutcome> {
        let previous = self.source().await;
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => previous
                .as_ref()
                .map(|source| source.path.clone())
                .or_else(|| self.config.index_path())
                .ok_or_else(|| {
                    anyhow!("No index path configured. Pass a path or set DOCSEARCH_INDEX.")
                })?,
        };

        let start = Instant::now();
        tracing::info!("Loading search index from {}", path.display());

        // Reading and indexing are CPU-bound; keep them off the async workers
        let task_path = path.clone();
        let (loaded_path, fingerprint, index) = tokio::task::spawn_blocking(move || {
            let LoadedCorpus {
                path,
                records,
                fingerprint,
            } = loader::load(&task_path)?;
            Ok::<_, SearchError>((path, fingerprint, SearchIndex::build(records)))
        })
        .await
        .context("Index build task panicked")?
        .with_context(|| format!("Failed to load search index from {}", path.display()))?;

        let changed = previous
            .as_ref()
            .is_none_or(|source| source.fingerprint != fingerprint);
        let outcome = ReloadOutcome {
            path: loaded_path.clone(),
            records: index.records().len(),
            terms: index.index().term_count(),
            changed,
            elapsed: start.elapsed(),
        };

        // Publish index before provenance so a reader never sees a source
        // describing an index that isn't live yet
        *self.index.write().await = Some(Arc::new(index));
        *self.source.write().await = Some(IndexSource {
            path: loaded_path,
            fingerprint,
            loaded_at: SystemTime::now(),
        });

        tracing::info!(
            "Published search index: {} records, {} terms (changed: {}) in {:?}",
            outcome.records,
            outcome.terms,
            outcome.changed,
            outcome.elapsed
        );

        Ok(outcome)
    }
}
