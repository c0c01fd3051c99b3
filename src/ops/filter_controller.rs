use std::time::{Duration, Instant};

use tracing::info;

use crate::model::page::Page;
use crate::ops::debounce::Debouncer;
use crate::ops::filter::{self, FilterQuery};
use crate::ops::url_state::UrlStateSync;

/// Quiet period between the last keystroke and the filter running.
pub const FILTER_DELAY: Duration = Duration::from_millis(300);

/// The search box as the user sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    pub text: String,
    pub focused: bool,
}

/// Owns the post-list search: debounced typing, immediate submit and
/// clear, and keeping the address in step with the active query.
#[derive(Debug)]
pub struct FilterController {
    input: SearchInput,
    query: FilterQuery,
    match_count: usize,
    debouncer: Debouncer<String>,
    sync: UrlStateSync,
    applications: u64,
}

impl FilterController {
    /// Read the initial query from the page address and apply it at once.
    pub fn new(page: &mut Page) -> Self {
        Self::with_sync(page, UrlStateSync::default())
    }

    pub fn with_sync(page: &mut Page, sync: UrlStateSync) -> Self {
        let initial = sync.read(page.address.current()).unwrap_or_default();
        let query = FilterQuery::new(&initial);
        let match_count = filter::apply(&mut page.items, &query);
        FilterController {
            input: SearchInput {
                text: initial,
                focused: false,
            },
            query,
            match_count,
            debouncer: Debouncer::new(),
            sync,
            applications: 0,
        }
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn match_count(&self) -> usize {
        self.match_count
    }

    /// How many times the filter ran in response to the user.
    pub fn applications(&self) -> u64 {
        self.applications
    }

    /// Zero matches for a non-empty query.
    pub fn shows_no_results(&self) -> bool {
        self.match_count == 0 && !self.query.is_empty()
    }

    pub fn focus(&mut self) {
        self.input.focused = true;
    }

    pub fn blur(&mut self) {
        self.input.focused = false;
    }

    /// A raw input event: the box now holds `text`.
    pub fn on_input(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.input.text = text.clone();
        self.debouncer.schedule(text, FILTER_DELAY, now);
    }

    /// Run the debounced filter if its quiet period has elapsed.
    pub fn tick(&mut self, page: &mut Page, now: Instant) -> Option<usize> {
        let text = self.debouncer.take_due(now)?;
        Some(self.run(page, &text))
    }

    /// Form submission: skip the debounce and apply the current text.
    pub fn submit(&mut self, page: &mut Page) -> usize {
        self.debouncer.cancel();
        let text = self.input.text.clone();
        self.run(page, &text)
    }

    /// Empty the box, show every item, focus the input and drop the
    /// parameter from the address.
    pub fn clear(&mut self, page: &mut Page) -> usize {
        self.debouncer.cancel();
        self.input.text.clear();
        self.input.focused = true;
        self.run(page, "")
    }

    /// When the event loop must wake to fire pending work.
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    fn run(&mut self, page: &mut Page, text: &str) -> usize {
        self.query = FilterQuery::new(text);
        self.match_count = filter::apply(&mut page.items, &self.query);
        self.sync.write(&mut page.address, text);
        self.applications += 1;
        info!(
            query = self.query.as_str(),
            matches = self.match_count,
            "post filter applied"
        );
        self.match_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::FilterableItem;
    use url::Url;

    fn page(url: &str) -> Page {
        let mut page = Page::new(Url::parse(url).unwrap());
        page.items = vec![
            FilterableItem::new("Hello World", "first post"),
            FilterableItem::new("Hello Rust", "second post"),
            FilterableItem::new("Goodbye", "world tour"),
        ];
        page
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn initial_query_from_address_is_applied_immediately() {
        let mut page = page("https://b.example/blog/?q=rust");
        let ctl = FilterController::new(&mut page);
        assert_eq!(ctl.input().text, "rust");
        assert_eq!(ctl.query().as_str(), "rust");
        assert_eq!(ctl.match_count(), 1);
        assert!(page.items[1].visible);
        assert!(!page.items[0].visible);
        // reading the address does not add history
        assert_eq!(page.address.history_len(), 1);
    }

    #[test]
    fn no_initial_query_shows_everything() {
        let mut page = page("https://b.example/blog/");
        let ctl = FilterController::new(&mut page);
        assert_eq!(ctl.match_count(), 3);
        assert!(!ctl.shows_no_results());
        assert_eq!(ctl.applications(), 0);
    }

    #[test]
    fn rapid_typing_applies_once_with_final_text() {
        let mut page = page("https://b.example/blog/");
        let mut ctl = FilterController::new(&mut page);
        let t0 = Instant::now();

        ctl.on_input("hello", t0);
        ctl.on_input("hello world", t0 + ms(80));

        assert_eq!(ctl.tick(&mut page, t0 + ms(300)), None);
        assert_eq!(ctl.tick(&mut page, t0 + ms(380)), Some(1));
        assert_eq!(ctl.tick(&mut page, t0 + ms(1000)), None);

        assert_eq!(ctl.applications(), 1);
        assert_eq!(ctl.query().as_str(), "hello world");
        assert_eq!(
            page.address.current().as_str(),
            "https://b.example/blog/?q=hello+world"
        );
    }

    #[test]
    fn submit_bypasses_debounce() {
        let mut page = page("https://b.example/blog/");
        let mut ctl = FilterController::new(&mut page);
        let t0 = Instant::now();

        ctl.on_input("WORLD", t0);
        assert_eq!(ctl.submit(&mut page), 2);
        assert_eq!(ctl.deadline(), None);
        assert_eq!(ctl.tick(&mut page, t0 + ms(500)), None);
        assert_eq!(ctl.applications(), 1);
        assert_eq!(page.address.current().query(), Some("q=WORLD"));
    }

    #[test]
    fn clear_resets_everything() {
        let mut page = page("https://b.example/blog/?q=goodbye&page=2");
        let mut ctl = FilterController::new(&mut page);
        assert_eq!(ctl.match_count(), 1);

        ctl.on_input("goodbyex", Instant::now());
        let count = ctl.clear(&mut page);

        assert_eq!(count, 3);
        assert!(page.items.iter().all(|i| i.visible));
        assert!(ctl.input().text.is_empty());
        assert!(ctl.input().focused);
        assert!(ctl.query().is_empty());
        assert_eq!(ctl.deadline(), None);
        assert_eq!(page.address.current().as_str(), "https://b.example/blog/?page=2");
    }

    #[test]
    fn no_results_flag() {
        let mut page = page("https://b.example/blog/");
        let mut ctl = FilterController::new(&mut page);
        ctl.on_input("nothing here", Instant::now());
        ctl.submit(&mut page);
        assert_eq!(ctl.match_count(), 0);
        assert!(ctl.shows_no_results());
    }
}
