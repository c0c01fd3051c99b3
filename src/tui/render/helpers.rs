use ratatui::text::Span;

use crate::util::unicode;

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `text` with spaces to exactly `cells` columns, truncating if longer.
pub(super) fn fit_to_width(text: &str, cells: usize) -> String {
    let fitted = unicode::truncate_to_width(text, cells);
    let width = unicode::display_width(&fitted);
    format!("{}{}", fitted, " ".repeat(cells.saturating_sub(width)))
}
