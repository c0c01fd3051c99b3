use url::Url;

/// The page's navigable address together with its session history.
///
/// Entries are only ever added or swapped in place; nothing here
/// re-fetches the page.
#[derive(Debug, Clone)]
pub struct Address {
    entries: Vec<Url>,
}

impl Address {
    pub fn new(url: Url) -> Self {
        Address {
            entries: vec![url],
        }
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.entries.len() - 1]
    }

    /// Add a history entry.
    pub fn push(&mut self, url: Url) {
        self.entries.push(url);
    }

    /// Swap the current entry without growing history.
    pub fn replace(&mut self, url: Url) {
        let last = self.entries.len() - 1;
        self.entries[last] = url;
    }

    pub fn history_len(&self) -> usize {
        self.entries.len()
    }
}
