//! Query execution: candidate retrieval, ranking and result assembly.

use crate::record::{Category, DocRecord, Field};
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;
use std::collections::BTreeSet;

use super::index::{RecordId, SearchIndex};
use super::scoring::FieldWeights;
use super::snippet::{self, DEFAULT_SNIPPET_CHARS};
use super::tokenize::tokenize;

/// Default number of results returned by [`SearchIndex::search`] callers that
/// don't specify one.
pub const DEFAULT_LIMIT: usize = 20;

/// Minimum Jaro-Winkler similarity for a term to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Tuning knobs for a single query.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of results; zero yields nothing
    pub limit: usize,
    /// Only records in these categories are candidates. `None` or empty means all.
    pub categories: Option<Vec<Category>>,
    /// Character budget for each snippet
    pub snippet_chars: usize,
    pub weights: FieldWeights,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            categories: None,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
            weights: FieldWeights::default(),
        }
    }
}

impl SearchOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    fn admits(&self, category: &Category) -> bool {
        match &self.categories {
            Some(allowed) if !allowed.is_empty() => allowed.contains(category),
            _ => true,
        }
    }
}

/// A ranked match for a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub record_id: RecordId,
    pub record: DocRecord,
    pub score: f64,
    /// Fields that contained at least one query token
    pub matched_fields: BTreeSet<Field>,
    pub snippet: String,
}

impl SearchResult {
    pub fn location(&self) -> &str {
        &self.record.location
    }

    pub fn title(&self) -> &str {
        &self.record.title
    }

    pub fn matched(&self, field: Field) -> bool {
        self.matched_fields.contains(&field)
    }
}

#[derive(Default)]
struct Candidate {
    score: f64,
    fields: BTreeSet<Field>,
}

impl SearchIndex {
    /// Searches with default options and the given result limit.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        self.search_with(query, &SearchOptions::with_limit(limit))
    }

    /// Searches for records matching any token of `query`.
    ///
    /// Candidates are ranked by score descending, ties broken by ascending
    /// record id, so identical input always yields identical output. Queries
    /// with no usable tokens, or whose tokens appear nowhere, return nothing.
    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        if options.limit == 0 {
            return vec![];
        }

        let terms = query_terms(query);
        if terms.is_empty() {
            return vec![];
        }

        let mut candidates: AHashMap<RecordId, Candidate> = AHashMap::new();
        for term in &terms {
            for posting in self.index().postings(term) {
                let Some(record) = self.records().get(posting.record_id) else {
                    continue;
                };
                if !options.admits(&record.category) {
                    continue;
                }

                let candidate = candidates.entry(posting.record_id).or_default();
                candidate.score += options
                    .weights
                    .posting_score(posting.field, posting.term_frequency);
                candidate.fields.insert(posting.field);
            }
        }

        let candidate_count = candidates.len();
        let mut ranked: Vec<_> = candidates.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| b.score.total_cmp(&a.score).then(a_id.cmp(b_id)));
        ranked.truncate(options.limit);

        tracing::debug!(
            "Query {:?}: {} terms, {} candidates, returning {}",
            query,
            terms.len(),
            candidate_count,
            ranked.len()
        );

        ranked
            .into_iter()
            .filter_map(|(record_id, candidate)| {
                let record = self.records().get(record_id)?;
                let snippet = if candidate.fields.contains(&Field::Text) {
                    snippet::extract(&record.text, &record.title, &terms, options.snippet_chars)
                } else {
                    record.title.clone()
                };

                Some(SearchResult {
                    record_id,
                    record: record.clone(),
                    score: candidate.score,
                    matched_fields: candidate.fields,
                    snippet,
                })
            })
            .collect()
    }

    /// Suggests indexed terms that look like `term`, best match first.
    ///
    /// Intended for "did you mean" hints when a query finds nothing.
    pub fn suggest(&self, term: &str, limit: usize) -> Vec<String> {
        let needle = term.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .index()
            .terms()
            .filter(|candidate| *candidate != needle)
            .map(|candidate| {
                (
                    jaro_winkler::similarity(needle.chars(), candidate.chars()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| b_score.total_cmp(a_score).then(a.cmp(b)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

/// Tokenizes a query and drops repeated terms, keeping first-occurrence order.
pub(crate) fn query_terms(query: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tokenize(query)
        .into_iter()
        .filter(|term| seen.insert(term.clone()))
        .collect()
}
