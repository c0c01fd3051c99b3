use percent_encoding::percent_decode_str;
use serde::Serialize;
use tracing::debug;

use crate::model::page::Page;
use crate::ops::toggle::ToggleError;

/// Cookie set by the server's anti-forgery middleware.
pub const CSRF_COOKIE: &str = "csrftoken";
/// Meta tag some templates render the token into.
pub const CSRF_META: &str = "csrf-token";
/// Hidden field rendered inside every POST form.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Anti-forgery credential. The value is kept out of `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token(<{} chars>)", self.0.len())
    }
}

/// Where a token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenOrigin {
    Cookie,
    MetaTag,
    FormField,
}

impl TokenOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenOrigin::Cookie => "cookie",
            TokenOrigin::MetaTag => "meta_tag",
            TokenOrigin::FormField => "form_field",
        }
    }
}

/// One place a token may live.
pub trait TokenSource: Send + Sync {
    fn origin(&self) -> TokenOrigin;
    fn lookup(&self, page: &Page) -> Option<String>;
}

pub struct CookieSource {
    pub name: &'static str,
}

impl TokenSource for CookieSource {
    fn origin(&self) -> TokenOrigin {
        TokenOrigin::Cookie
    }

    fn lookup(&self, page: &Page) -> Option<String> {
        cookie_value(&page.cookie, self.name)
    }
}

pub struct MetaTagSource {
    pub name: &'static str,
}

impl TokenSource for MetaTagSource {
    fn origin(&self) -> TokenOrigin {
        TokenOrigin::MetaTag
    }

    fn lookup(&self, page: &Page) -> Option<String> {
        page.meta
            .iter()
            .find(|m| m.name == self.name)
            .map(|m| m.content.clone())
    }
}

pub struct FormFieldSource {
    pub name: &'static str,
}

impl TokenSource for FormFieldSource {
    fn origin(&self) -> TokenOrigin {
        TokenOrigin::FormField
    }

    fn lookup(&self, page: &Page) -> Option<String> {
        page.forms
            .iter()
            .flat_map(|form| form.hidden.iter())
            .find(|field| field.name == self.name)
            .map(|field| field.value.clone())
    }
}

/// Find the first `name=value` pair in a cookie string and percent-decode it.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

/// Ordered token lookup; the first source that yields a non-empty value wins.
pub struct TokenResolver {
    sources: Vec<Box<dyn TokenSource>>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        TokenResolver {
            sources: vec![
                Box::new(CookieSource { name: CSRF_COOKIE }),
                Box::new(MetaTagSource { name: CSRF_META }),
                Box::new(FormFieldSource { name: CSRF_FIELD }),
            ],
        }
    }
}

impl TokenResolver {
    pub fn with_sources(sources: Vec<Box<dyn TokenSource>>) -> Self {
        TokenResolver { sources }
    }

    pub fn locate(&self, page: &Page) -> Option<(Token, TokenOrigin)> {
        self.sources.iter().find_map(|source| {
            let found = source.lookup(page).filter(|v| !v.is_empty());
            debug!(origin = source.origin().as_str(), hit = found.is_some(), "token lookup");
            found.map(|v| (Token::new(v), source.origin()))
        })
    }

    pub fn resolve(&self, page: &Page) -> Result<Token, ToggleError> {
        self.locate(page)
            .map(|(token, _)| token)
            .ok_or(ToggleError::TokenNotFound)
    }
}
