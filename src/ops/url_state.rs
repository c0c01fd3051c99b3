use tracing::debug;
use url::Url;

use crate::model::address::Address;

/// Address parameter holding the filter text.
pub const QUERY_PARAM: &str = "q";

/// How a changed address enters session history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Push,
    Replace,
}

/// Mirrors the filter text into the page address without reloading.
#[derive(Debug, Clone, Default)]
pub struct UrlStateSync {
    pub mode: HistoryMode,
}

impl UrlStateSync {
    pub fn new(mode: HistoryMode) -> Self {
        UrlStateSync { mode }
    }

    /// The non-empty filter text carried by `url`, if any.
    pub fn read(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(k, _)| k == QUERY_PARAM)
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.trim().is_empty())
    }

    /// `url` with the parameter set to `query` (trimmed), or removed when
    /// it is empty. Other parameters keep their order.
    pub fn with_query(&self, url: &Url, query: &str) -> Url {
        let query = query.trim();
        let mut pairs: Vec<(String, String)> = Vec::new();
        let mut placed = false;
        for (k, v) in url.query_pairs() {
            if k == QUERY_PARAM {
                if !placed && !query.is_empty() {
                    pairs.push((k.into_owned(), query.to_string()));
                }
                placed = true;
                continue;
            }
            pairs.push((k.into_owned(), v.into_owned()));
        }
        if !placed && !query.is_empty() {
            pairs.push((QUERY_PARAM.to_string(), query.to_string()));
        }

        let mut next = url.clone();
        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(pairs);
        }
        next
    }

    /// Write `query` into the address. Returns false when nothing changed.
    pub fn write(&self, address: &mut Address, query: &str) -> bool {
        let next = self.with_query(address.current(), query);
        if &next == address.current() {
            return false;
        }
        debug!(url = %next, mode = ?self.mode, "address updated");
        match self.mode {
            HistoryMode::Push => address.push(next),
            HistoryMode::Replace => address.replace(next),
        }
        true
    }
}
