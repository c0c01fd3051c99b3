use tracing::debug;

use crate::model::item::FilterableItem;

/// Normalized filter text: trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery(String);

impl FilterQuery {
    pub fn new(raw: &str) -> Self {
        FilterQuery(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Substring match against title or body. An empty query matches everything.
pub fn matches(item: &FilterableItem, query: &FilterQuery) -> bool {
    query.is_empty()
        || item.title_key.contains(query.as_str())
        || item.body_key.contains(query.as_str())
}

/// Set every item's visibility for `query` and return how many are visible.
pub fn apply(items: &mut [FilterableItem], query: &FilterQuery) -> usize {
    let mut visible = 0;
    for item in items.iter_mut() {
        item.visible = matches(item, query);
        if item.visible {
            visible += 1;
        }
    }
    debug!(query = query.as_str(), visible, total = items.len(), "filter applied");
    visible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<FilterableItem> {
        vec![
            FilterableItem::new("Rust Ownership", "borrowing and moves"),
            FilterableItem::new("Async Python", "a little rust comparison"),
            FilterableItem::new("CSS Grid", "layout tricks"),
        ]
    }

    fn visibility(items: &[FilterableItem]) -> Vec<bool> {
        items.iter().map(|i| i.visible).collect()
    }

    #[test]
    fn empty_query_shows_everything() {
        let mut items = items();
        apply(&mut items, &FilterQuery::new("grid"));
        for raw in ["", "   ", "\t"] {
            let count = apply(&mut items, &FilterQuery::new(raw));
            assert_eq!(count, items.len());
            assert!(items.iter().all(|i| i.visible));
        }
    }

    #[test]
    fn matches_title_or_body_case_insensitively() {
        let mut items = items();
        let count = apply(&mut items, &FilterQuery::new("  RUST "));
        assert_eq!(count, 2);
        assert_eq!(visibility(&items), vec![true, true, false]);

        let count = apply(&mut items, &FilterQuery::new("layout"));
        assert_eq!(count, 1);
        assert_eq!(visibility(&items), vec![false, false, true]);
    }

    #[test]
    fn no_matches() {
        let mut items = items();
        assert_eq!(apply(&mut items, &FilterQuery::new("haskell")), 0);
        assert!(items.iter().all(|i| !i.visible));
    }

    #[test]
    fn apply_is_idempotent_and_history_independent() {
        for q in ["", "rust", "a", "zzz", "grid"] {
            let query = FilterQuery::new(q);

            let mut fresh = items();
            let first = apply(&mut fresh, &query);
            let first_vis = visibility(&fresh);
            let second = apply(&mut fresh, &query);
            assert_eq!(first, second);
            assert_eq!(first_vis, visibility(&fresh));

            let mut dirty = items();
            apply(&mut dirty, &FilterQuery::new("python"));
            assert_eq!(apply(&mut dirty, &query), first);
            assert_eq!(visibility(&dirty), first_vis);
        }
    }
}
