//! Full-text search handler for finding documentation records.

use crate::record::Category;
use crate::search::{SearchResult, tokenize};
use crate::state::IndexState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Number of "did you mean" terms offered when a query finds nothing.
const SUGGESTION_COUNT: usize = 3;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search query; any word may match a title, category or body text
    pub query: String,
    /// Maximum number of results to return (default: 20)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only return records of these categories: section, page, type, method, function, macro
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// Execute a search against the published index and format the results.
pub async fn handle_search(state: &IndexState, request: SearchRequest) -> Result<String, String> {
    let Some(index) = state.current().await else {
        return Err("No search index loaded.\n\n\
             To load one:\n\
             • Use reload_index with a path to search_index.js or a built docs directory\n\
             • Or start the server with DOCSEARCH_INDEX set"
            .to_string());
    };

    let categories = request.categories.as_ref().map(|names| {
        names
            .iter()
            .map(|name| Category::from(name.as_str()))
            .collect::<Vec<_>>()
    });
    let options = state.config().search_options(request.limit, categories);
    let results = index.search_with(&request.query, &options);

    if results.is_empty() {
        let mut msg = format!("No results found for '{}'.\n\n", request.query);

        let suggestions: Vec<String> = tokenize(&request.query)
            .iter()
            .flat_map(|term| index.suggest(term, SUGGESTION_COUNT))
            .take(SUGGESTION_COUNT)
            .collect();
        if !suggestions.is_empty() {
            let _ = writeln!(msg, "Did you mean: {}\n", suggestions.join(", "));
        }

        msg.push_str("Search tips:\n");
        msg.push_str("• Words shorter than two characters are ignored\n");
        msg.push_str("• Matching is whole-word: 'Spin' matches 'spin', not 'SpinGlass'\n");
        msg.push_str("• Any query word may match, so adding words widens results\n");
        if options.categories.as_ref().is_some_and(|c| !c.is_empty()) {
            msg.push_str("• Try again without the category filter\n");
        }

        return Ok(msg);
    }

    Ok(format_search_results(&results, &request.query))
}

/// Format search results into a readable string output.
fn format_search_results(results: &[SearchResult], query: &str) -> String {
    let mut output = format!(
        "Search results for '{}' ({} shown):\n\n",
        query,
        results.len()
    );

    let max_score = results.first().map_or(1.0, |r| r.score);

    for (idx, result) in results.iter().enumerate() {
        let relevance = relevance_percent(result.score, max_score);
        let record = &result.record;
        let matched: Vec<_> = result.matched_fields.iter().map(|f| f.as_str()).collect();

        let _ = writeln!(
            output,
            "{}. {} [{}] - relevance: {}%",
            idx + 1,
            record.title,
            record.category,
            relevance
        );
        let _ = writeln!(output, "   location: {}", record.location);
        if !record.page.is_empty() && record.page != record.title {
            let _ = writeln!(output, "   page: {}", record.page);
        }
        let _ = writeln!(output, "   matched: {}", matched.join(", "));
        if result.snippet != record.title {
            let _ = writeln!(output, "   {}", result.snippet.replace('\n', " "));
        }

        output.push('\n');
    }

    output
}

// Clamped to 0..=100 before the cast
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn relevance_percent(score: f64, max_score: f64) -> u8 {
    if max_score <= 0.0 {
        return 0;
    }
    ((score / max_score) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case(4.0, 4.0, 100)]
    #[case(1.0, 4.0, 25)]
    #[case(0.0, 4.0, 0)]
    #[case(1.0, 0.0, 0)]
    fn test_relevance_percent(#[case] score: f64, #[case] max: f64, #[case] expected: u8) {
        check!(relevance_percent(score, max) == expected);
    }
}
