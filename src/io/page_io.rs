use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::model::page::Page;
use crate::parse::parse_page;

#[derive(Debug, thiserror::Error)]
#[error("could not read {path}: {source}")]
pub struct PageFileError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Load a saved page from disk as if it had been served at `address`.
pub fn load_page_file(path: &Path, address: Url, cookie: Option<&str>) -> Result<Page, PageFileError> {
    let html = fs::read_to_string(path).map_err(|e| PageFileError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut page = parse_page(&html, address);
    if let Some(cookie) = cookie {
        page.cookie = cookie.to_string();
    }
    Ok(page)
}
