//! Handler describing the currently published index.

use crate::state::IndexState;
use std::fmt::Write as _;

pub async fn handle_index_stats(state: &IndexState) -> Result<String, String> {
    let Some(index) = state.current().await else {
        return Err("No search index loaded. Use reload_index to load one.".to_string());
    };
    let stats = index.stats();

    let mut output = String::from("Search index:\n");
    if let Some(source) = state.source().await {
        let _ = writeln!(output, "  source: {}", source.path.display());
        let _ = writeln!(output, "  fingerprint: {:016x}", source.fingerprint);
    } else {
        output.push_str("  source: in-memory\n");
    }
    let _ = writeln!(output, "  records: {}", stats.records);
    let _ = writeln!(output, "  unique terms: {}", stats.terms);
    let _ = writeln!(output, "  postings: {}", stats.postings);

    if !stats.categories.is_empty() {
        output.push_str("\nRecords by category:\n");
        for (category, count) in &stats.categories {
            let name = if category.is_empty() {
                "(none)"
            } else {
                category.as_str()
            };
            let _ = writeln!(output, "  • {}: {}", name, count);
        }
    }

    Ok(output)
}
