use std::ops::Range;

use regex::Regex;

/// Case-insensitive alternation of the whitespace-separated terms in
/// `query`, longest first so overlapping terms prefer the longer match.
pub fn term_regex(query: &str) -> Option<Regex> {
    let mut terms: Vec<&str> = query.split_whitespace().collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by_key(|t| std::cmp::Reverse(t.len()));
    terms.dedup();
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){}", alternation)).ok()
}

/// Byte ranges of `text` matching any term of `query`, non-overlapping
/// and in order.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    match term_regex(query) {
        Some(re) => re.find_iter(text).map(|m| m.start()..m.end()).collect(),
        None => Vec::new(),
    }
}
