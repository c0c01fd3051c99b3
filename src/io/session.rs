use std::path::PathBuf;

use url::Url;

use crate::io::config_io::{self, ConfigError};
use crate::io::http::{FetchError, HttpClient};
use crate::io::page_io::{self, PageFileError};
use crate::model::config::DeckConfig;
use crate::model::page::Page;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    PageFile(#[from] PageFileError),
}

/// Where the page comes from and what to send with requests.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub page_file: Option<PathBuf>,
    pub cookie: Option<String>,
}

/// Config, address and HTTP client for one run.
pub struct Session {
    pub config: DeckConfig,
    pub address: Url,
    pub client: HttpClient,
    options: SessionOptions,
}

impl Session {
    pub fn open(options: SessionOptions) -> Result<Self, SessionError> {
        let config = config_io::load_config(options.config.as_deref())?;
        let address = config_io::page_address(&config, options.url.as_deref())?;
        let client = HttpClient::new(&config.http)?;
        if let Some(cookie) = options.cookie.as_deref() {
            client.add_cookies(cookie, &address);
        }
        Ok(Session {
            config,
            address,
            client,
            options,
        })
    }

    /// Fetch the page, or read it from `--page-file` when one was given.
    pub async fn load_page(&self) -> Result<Page, SessionError> {
        match self.options.page_file.as_deref() {
            Some(path) => Ok(page_io::load_page_file(
                path,
                self.address.clone(),
                self.options.cookie.as_deref(),
            )?),
            None => Ok(self.client.fetch_page(&self.address).await?),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.options.page_file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn page_file_session_needs_no_network() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("deck.toml");
        fs::write(&config, "[site]\nbase_url = \"https://b.example\"\n").unwrap();
        let page_file = tmp.path().join("list.html");
        fs::write(
            &page_file,
            r#"<meta name="csrf-token" content="m1"><div class="post-card" data-post-title="A" data-post-content="b"></div>"#,
        )
        .unwrap();

        let session = Session::open(SessionOptions {
            config: Some(config),
            page_file: Some(page_file),
            cookie: Some("sessionid=s".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(session.is_offline());
        assert_eq!(session.address.as_str(), "https://b.example/blog/");

        let page = session.load_page().await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.cookie, "sessionid=s");
    }

    #[test]
    fn bad_config_surfaces() {
        let err = Session::open(SessionOptions {
            config: Some(PathBuf::from("/nonexistent/deck.toml")),
            ..Default::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, SessionError::Config(ConfigError::ReadError { .. })));
    }
}
