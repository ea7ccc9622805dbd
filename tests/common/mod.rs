//! Shared test fixtures and utilities for integration tests.
//!
//! # Fixture corpus
//!
//! `tests/fixtures/search_index.js` is a slice of a real generated search index
//! (16 records: sections, pages, types, functions and macros, including several
//! records that share a `location`). Tests either decode it directly with
//! [`fixture_records`] or load it through an [`IndexState`] from a temporary
//! docs directory with the [`docs_dir`] fixture.

use docsearch_mcp::loader::{self, INDEX_FILE_NAME};
use docsearch_mcp::{Category, Config, DocRecord, IndexState};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Raw contents of the fixture search index.
pub const FIXTURE_INDEX: &str = include_str!("../fixtures/search_index.js");

/// Decodes the fixture corpus.
#[allow(dead_code)] // Used by a subset of integration test crates
pub fn fixture_records() -> Vec<DocRecord> {
    loader::parse_records(FIXTURE_INDEX).expect("fixture index should parse")
}

/// The two-record corpus used to check title-over-text ranking.
#[allow(dead_code)] // Used by a subset of integration test crates
pub fn spin_glass_pair() -> Vec<DocRecord> {
    vec![
        DocRecord::new(
            "models/SpinGlass/",
            "Spin Glass",
            "Spin Glass",
            Category::Section,
            "the spin glass problem",
        ),
        DocRecord::new(
            "models/CircuitSAT/",
            "Circuit Satisfaction",
            "Circuit Satisfaction",
            Category::Section,
            "glass is not mentioned here",
        ),
    ]
}

/// A temporary built-docs directory holding the fixture at `build/search_index.js`.
///
/// The directory is removed when the fixture is dropped.
pub struct DocsDir {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl DocsDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        let docs = Self { _temp: temp, root };
        docs.write_index(FIXTURE_INDEX);
        docs
    }

    /// Root of the docs tree (pass this to discovery).
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Full path of the search index file.
    pub fn index_file(&self) -> PathBuf {
        self.root.join("build").join(INDEX_FILE_NAME)
    }

    /// Replaces the search index file contents.
    pub fn write_index(&self, content: &str) {
        let path = self.index_file();
        std::fs::create_dir_all(path.parent().expect("index file has a parent"))
            .expect("Failed to create build directory");
        std::fs::write(&path, content).expect("Failed to write search index");
    }

    /// A state with the fixture already loaded.
    pub async fn loaded_state(&self) -> IndexState {
        let state = IndexState::new(Config::default());
        state
            .load(Some(self.path()))
            .await
            .expect("fixture index should load");
        state
    }
}

#[allow(dead_code)]
#[fixture]
pub fn docs_dir() -> DocsDir {
    docsearch_mcp::tracing::init(false);
    DocsDir::new()
}
