//! Inverted index and record store built once from a documentation batch.

use crate::error::SearchError;
use crate::record::{DocRecord, Field};
use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

use super::tokenize::IndexBuilder;

/// Position of a record in the input batch.
pub type RecordId = usize;

/// A single (token, record, field) occurrence with its pre-summed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub record_id: RecordId,
    pub field: Field,
    pub term_frequency: u32,
}

/// Mapping from normalized token to every posting that contains it.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    terms: AHashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub(super) fn new(terms: AHashMap<String, Vec<Posting>>) -> Self {
        Self { terms }
    }

    /// Postings for a token, empty if the token never occurs.
    pub fn postings(&self, token: &str) -> &[Posting] {
        self.terms.get(token).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.terms.contains_key(token)
    }

    /// Iterates over every indexed token, in no particular order.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Records addressable by [`RecordId`].
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<DocRecord>,
}

impl RecordStore {
    pub(super) fn new(records: Vec<DocRecord>) -> Self {
        Self { records }
    }

    pub fn get(&self, id: RecordId) -> Option<&DocRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &DocRecord)> {
        self.records.iter().enumerate()
    }
}

/// Summary counts describing a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub records: usize,
    pub terms: usize,
    pub postings: usize,
    /// Record count per category name
    pub categories: BTreeMap<String, usize>,
}

/// An immutable, queryable index over a static documentation corpus.
///
/// Built once by [`SearchIndex::build`] and never mutated afterwards, so a
/// shared reference (or an `Arc`) can serve any number of concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    index: InvertedIndex,
    records: RecordStore,
}

impl SearchIndex {
    /// Builds the index in a single pass. Record ids are input positions.
    ///
    /// An empty batch produces an empty index; searching it returns nothing.
    pub fn build(records: impl IntoIterator<Item = DocRecord>) -> Self {
        let records = records.into_iter();
        let mut builder = IndexBuilder::with_capacity(records.size_hint().0);
        for record in records {
            builder.add_record(record);
        }
        builder.finalize()
    }

    /// Builds from an already-decoded JSON payload.
    ///
    /// Accepts a bare array of records or an object with a `docs` array; any
    /// other shape is rejected with [`SearchError::InvalidInput`].
    pub fn from_json(value: serde_json::Value) -> Result<Self, SearchError> {
        crate::loader::records_from_value(value).map(Self::build)
    }

    pub(super) fn from_parts(index: InvertedIndex, records: RecordStore) -> Self {
        Self { index, records }
    }

    pub fn into_parts(self) -> (InvertedIndex, RecordStore) {
        (self.index, self.records)
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn stats(&self) -> IndexStats {
        let mut categories = BTreeMap::new();
        for (_, record) in self.records.iter() {
            *categories
                .entry(record.category.as_str().to_string())
                .or_insert(0) += 1;
        }

        IndexStats {
            records: self.records.len(),
            terms: self.index.term_count(),
            postings: self.index.posting_count(),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use crate::search::tokenize;
    use assert2::check;
    use serde_json::json;

    fn corpus() -> Vec<DocRecord> {
        vec![
            DocRecord::new(
                "models/SpinGlass/#Spin-Glass",
                "Spin Glass",
                "Spin Glass",
                Category::Section,
                "",
            ),
            DocRecord::new(
                "models/",
                "Model Problem",
                "Model Problem",
                Category::Page,
                "A model problem is a subclass of AbstractProblem.",
            ),
            DocRecord::new(
                "models/",
                "Model Problem",
                "Model Problem",
                Category::Page,
                "Required functions include:",
            ),
        ]
    }

    #[test]
    fn test_empty_build() {
        let index = SearchIndex::build(Vec::new());
        check!(index.records().is_empty());
        check!(index.index().is_empty());
    }

    #[test]
    fn test_every_field_token_is_a_key() {
        let records = corpus();
        let index = SearchIndex::build(records.clone());

        for record in &records {
            for field in Field::ALL {
                for token in tokenize(record.field(field)) {
                    check!(index.index().contains(&token), "missing token {}", token);
                }
            }
        }
    }

    #[test]
    fn test_postings_reference_valid_records() {
        let index = SearchIndex::build(corpus());
        for term in index.index().terms() {
            for posting in index.index().postings(term) {
                check!(index.records().get(posting.record_id).is_some());
            }
        }
    }

    #[test]
    fn test_one_posting_per_token_record_field() {
        let index = SearchIndex::build(corpus());
        let postings = index.index().postings("model");
        // title of records 1 and 2, text of record 1
        check!(postings.len() == 3);
        check!(
            postings
                .iter()
                .filter(|p| p.record_id == 1 && p.field == Field::Title)
                .count()
                == 1
        );
    }

    #[test]
    fn test_duplicate_locations_are_distinct_records() {
        let index = SearchIndex::build(corpus());
        check!(index.records().len() == 3);
        check!(index.records().get(1).map(|r| r.location.as_str()) == Some("models/"));
        check!(index.records().get(2).map(|r| r.location.as_str()) == Some("models/"));
    }

    #[test]
    fn test_stats() {
        let stats = SearchIndex::build(corpus()).stats();
        check!(stats.records == 3);
        check!(stats.categories.get("page") == Some(&2));
        check!(stats.categories.get("section") == Some(&1));
        check!(stats.postings >= stats.terms);
    }

    #[test]
    fn test_from_json_rejects_non_list() {
        let result = SearchIndex::from_json(json!(42));
        check!(matches!(result, Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_from_json_accepts_array() {
        let index = SearchIndex::from_json(json!([
            {"location": "a/", "page": "A", "title": "Alpha", "category": "page", "text": "first"}
        ]))
        .unwrap();
        check!(index.records().len() == 1);
        check!(index.index().contains("alpha"));
    }
}
