//! Snippet extraction around the first query match in a record's text.

use std::ops::Range;

use super::tokenize::{tokenize, word_spans};

/// Default snippet budget, in characters.
pub const DEFAULT_SNIPPET_CHARS: usize = 160;

/// Produces a short excerpt of `text` surrounding the earliest occurrence of any
/// of `terms`, at most `budget` characters long.
///
/// Falls back to the full `title` when `text` contains none of the terms (the
/// record matched on title or category only) or when `budget` is zero.
pub fn extract(text: &str, title: &str, terms: &[String], budget: usize) -> String {
    match locate(text, terms) {
        Some(hit) if budget > 0 => window(text, hit, budget).trim().to_string(),
        _ => title.to_string(),
    }
}

/// Byte range of the first word in `text` that normalizes to one of `terms`.
fn locate(text: &str, terms: &[String]) -> Option<Range<usize>> {
    word_spans(text)
        .find(|(_, word)| tokenize(word).iter().any(|token| terms.contains(token)))
        .map(|(start, word)| start..start + word.len())
}

/// Centers `hit` in a window of at most `budget` characters.
///
/// An edge that falls inside a word is pulled in to the nearest whitespace when
/// that doesn't cut into the hit. Edges already on a word boundary stay put.
fn window(text: &str, hit: Range<usize>, budget: usize) -> &str {
    let total_chars = text.chars().count();
    if total_chars <= budget {
        return text;
    }

    let hit_start = text[..hit.start].chars().count();
    let hit_chars = text[hit.clone()].chars().count();
    if hit_chars >= budget {
        let end = byte_offset(text, hit_start + budget);
        return &text[hit.start..end];
    }

    let before = (budget - hit_chars) / 2;
    let mut start = hit_start.saturating_sub(before);
    let end = (start + budget).min(total_chars);
    start = end.saturating_sub(budget);

    let mut start = byte_offset(text, start);
    let mut end = byte_offset(text, end);

    if text[..start].chars().next_back().is_some_and(char::is_alphanumeric)
        && text[start..].chars().next().is_some_and(char::is_alphanumeric)
        && let Some(space) = text[start..hit.start].find(char::is_whitespace)
    {
        start += space;
    }
    if text[end..].chars().next().is_some_and(char::is_alphanumeric)
        && text[..end].chars().next_back().is_some_and(char::is_alphanumeric)
        && let Some(space) = text[hit.end..end].rfind(char::is_whitespace)
    {
        end = hit.end + space;
    }

    &text[start..end]
}

/// Byte offset of the `index`-th character, or the string length past the end.
fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}
