//! Fetch Request Module
//!
//! The request value observed by the interceptor. Bodies are reference-counted
//! so cloning a request for the network attempt is cheap.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::error::{CacheError, Result};

// == Request Mode ==
/// How the browser intends to use the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Loading a full HTML document for the address bar
    Navigate,
    /// Same-origin subresource fetch
    SameOrigin,
    /// Opaque cross-origin subresource fetch
    NoCors,
    /// CORS subresource fetch
    Cors,
}

impl RequestMode {
    /// Parses a `Sec-Fetch-Mode` header value.
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "navigate" => Some(RequestMode::Navigate),
            "same-origin" => Some(RequestMode::SameOrigin),
            "no-cors" => Some(RequestMode::NoCors),
            "cors" => Some(RequestMode::Cors),
            _ => None,
        }
    }

    /// Derives the mode for an incoming request.
    ///
    /// `Sec-Fetch-Mode` wins when present. Older clients that omit it are
    /// treated as navigating when a GET asks for HTML.
    pub fn detect(method: &Method, headers: &HeaderMap) -> Self {
        if let Some(mode) = headers
            .get("sec-fetch-mode")
            .and_then(|v| v.to_str().ok())
            .and_then(RequestMode::from_header)
        {
            return mode;
        }

        let wants_html = headers
            .get(axum::http::header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .map(|accept| accept.contains("text/html"))
            .unwrap_or(false);

        if *method == Method::GET && wants_html {
            RequestMode::Navigate
        } else {
            RequestMode::NoCors
        }
    }

    pub fn is_navigate(&self) -> bool {
        matches!(self, RequestMode::Navigate)
    }
}

// == Fetch Request ==
/// A request seen by the fetch handler.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    pub mode: RequestMode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchRequest {
    /// Creates a bodyless GET request.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            mode: RequestMode::NoCors,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Parses `url` and creates a bodyless GET request for it.
    pub fn parse_get(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| CacheError::InvalidRequest(format!("Invalid URL '{}': {}", url, e)))?;
        Ok(Self::get(url))
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// True when the request identifies a user through `Cookie` or
    /// `Authorization`. Responses to such requests are user-specific.
    pub fn carries_credentials(&self) -> bool {
        self.headers.contains_key(header::COOKIE)
            || self.headers.contains_key(header::AUTHORIZATION)
    }

    /// Path component of the request URL.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Key under which responses to this request are stored.
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

/// Normalizes a URL into a cache key. Fragments never reach the network, so
/// they are dropped.
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}
