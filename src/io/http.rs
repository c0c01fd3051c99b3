use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, REFERER};
use tracing::{debug, info};
use url::Url;

use crate::model::config::HttpConfig;
use crate::model::page::Page;
use crate::ops::classify::Reply;
use crate::ops::toggle::{
    HEADER_REQUESTED_WITH, HEADER_TOKEN, LikeRequest, REQUESTED_WITH_XHR, Transport,
    TransportError,
};
use crate::parse::parse_page;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("could not build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("could not reach {url}: {source}")]
    Request { url: Url, source: reqwest::Error },
    #[error("{url} answered with status {status}")]
    Status { url: Url, status: u16 },
}

/// HTTP client with a shared cookie jar, so the session and
/// anti-forgery cookies set by a page load ride along on like requests.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(FetchError::Client)?;
        Ok(HttpClient { client, jar })
    }

    /// Seed the jar, e.g. with a session cookie copied from a browser.
    pub fn add_cookies(&self, cookies: &str, url: &Url) {
        for pair in cookies.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, url);
        }
    }

    /// Cookies the jar would send to `url`, as a `name=value; …` string.
    pub fn cookie_header(&self, url: &Url) -> String {
        self.jar
            .cookies(url)
            .and_then(|v| v.to_str().ok().map(str::to_owned))
            .unwrap_or_default()
    }

    /// GET a page and extract its surface.
    pub async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let request_err = |source| FetchError::Request {
            url: url.clone(),
            source,
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(request_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.clone(),
                status: status.as_u16(),
            });
        }
        let final_url = response.url().clone();
        let html = response.text().await.map_err(request_err)?;
        let mut page = parse_page(&html, final_url.clone());
        page.cookie = self.cookie_header(&final_url);
        info!(
            url = %final_url,
            posts = page.items.len(),
            likes = page.targets.len(),
            "page loaded"
        );
        Ok(page)
    }
}

impl Transport for HttpClient {
    fn send(
        &self,
        request: LikeRequest,
    ) -> impl Future<Output = Result<Reply, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            debug!(url = %request.url, "sending like request");
            let response = client
                .post(request.url.clone())
                .header(HEADER_TOKEN, request.token.expose())
                .header(HEADER_REQUESTED_WITH, REQUESTED_WITH_XHR)
                .header(REFERER, request.referer.as_str())
                .send()
                .await
                .map_err(|e| TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response
                .bytes()
                .await
                .map_err(|e| TransportError(e.to_string()))?
                .to_vec();
            Ok(Reply {
                status,
                content_type,
                body,
            })
        }
    }
}
