//! Text tokenization and term-frequency accumulation for search indexing.
//!
//! The same rule is applied to record fields at build time and to query strings
//! at search time: lower-case, split on runs of non-alphanumeric characters,
//! drop anything shorter than [`MIN_TOKEN_CHARS`]. No stemming, no stop words;
//! queries are usually short technical identifiers that must match verbatim.

use crate::record::{DocRecord, Field};
use ahash::AHashMap;

use super::index::{InvertedIndex, Posting, RecordId, RecordStore, SearchIndex};

/// Minimum token length in characters. Single characters (and lone symbols such
/// as `∧` or `¬` that survive nothing else) carry no lexical value.
pub(crate) const MIN_TOKEN_CHARS: usize = 2;

/// Tokenizes text into normalized search terms, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_owned)
        .collect()
}

/// Yields `(byte_offset, word)` for every alphanumeric run in the original text.
///
/// Used by snippet extraction to map normalized tokens back onto positions in
/// the unmodified string. Each word is re-tokenized with [`tokenize`] by the
/// caller so matching stays identical to indexing.
pub(crate) fn word_spans(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = text.char_indices().peekable();
    std::iter::from_fn(move || {
        // Skip separators
        while let Some(&(_, c)) = rest.peek() {
            if c.is_alphanumeric() {
                break;
            }
            rest.next();
        }

        let (start, _) = *rest.peek()?;
        let mut end = start;
        while let Some(&(i, c)) = rest.peek() {
            if !c.is_alphanumeric() {
                break;
            }
            end = i + c.len_utf8();
            rest.next();
        }

        Some((start, &text[start..end]))
    })
}

/// Builder that accumulates per-(token, record, field) frequencies before the
/// immutable [`SearchIndex`] is produced.
#[derive(Default)]
pub(crate) struct IndexBuilder {
    /// Map from token to its postings, in (record, field) insertion order
    terms: AHashMap<String, Vec<Posting>>,
    /// Records in input order; position is the record id
    records: Vec<DocRecord>,
    /// Total postings emitted, for build logging
    posting_count: usize,
}

impl IndexBuilder {
    pub(crate) fn with_capacity(records: usize) -> Self {
        Self {
            terms: AHashMap::default(),
            records: Vec::with_capacity(records),
            posting_count: 0,
        }
    }

    /// Assigns the next id to `record` and indexes its title, text and category.
    pub(crate) fn add_record(&mut self, record: DocRecord) -> RecordId {
        let record_id = self.records.len();
        for field in Field::ALL {
            self.add_field(record_id, field, record.field(field));
        }
        self.records.push(record);
        record_id
    }

    /// Counts token occurrences within one field and emits one posting per distinct token.
    fn add_field(&mut self, record_id: RecordId, field: Field, text: &str) {
        if text.is_empty() {
            return;
        }

        let tokens = tokenize(text);
        let mut counts: AHashMap<String, u32> = AHashMap::with_capacity(tokens.len());
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
        }

        self.posting_count += counts.len();
        for (token, term_frequency) in counts {
            self.terms.entry(token).or_default().push(Posting {
                record_id,
                field,
                term_frequency,
            });
        }
    }

    /// Freezes the accumulated postings and records into a queryable index.
    pub(crate) fn finalize(self) -> SearchIndex {
        let start = std::time::Instant::now();
        let index = SearchIndex::from_parts(
            InvertedIndex::new(self.terms),
            RecordStore::new(self.records),
        );

        tracing::info!(
            "Built search index: {} unique terms, {} records, {} postings in {:?}",
            index.index().term_count(),
            index.records().len(),
            self.posting_count,
            start.elapsed()
        );

        index
    }
}
