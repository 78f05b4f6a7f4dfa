//! Fetch Response Module
//!
//! Responses produced by the network, the cache or the offline fallbacks.

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use url::Url;

/// Body of the offline page returned for failed navigations.
pub const OFFLINE_PAGE: &str = "<html><body><h1>You are offline</h1><p>The RWANA Health Voice Assistant needs an internet connection to work fully.</p></body></html>";

/// Body returned for failed subresource requests.
pub const OFFLINE_TEXT: &str = "Offline";

/// Headers that describe a single connection and must not be replayed.
const HOP_BY_HOP: [&str; 6] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
];

// == Response Type ==
/// Origin classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Same-origin response
    Basic,
    /// Cross-origin response
    Cors,
    /// Synthesized locally rather than fetched
    Default,
}

// == Fetch Response ==
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub response_type: ResponseType,
    /// Final URL after redirects, `None` for synthesized responses
    pub url: Option<Url>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, response_type: ResponseType, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            response_type,
            url: None,
        }
    }

    /// Synthesized offline page for navigations.
    pub fn offline_page() -> Self {
        Self::synthesized(OFFLINE_PAGE, "text/html")
    }

    /// Synthesized plain-text offline marker for subresources.
    pub fn offline_text() -> Self {
        Self::synthesized(OFFLINE_TEXT, "text/plain;charset=UTF-8")
    }

    fn synthesized(body: &'static str, content_type: &'static str) -> Self {
        let mut response = Self::new(StatusCode::OK, ResponseType::Default, body);
        response
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        response
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// True for a 200 same-origin response, the only kind stored after a miss.
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.response_type == ResponseType::Basic
    }

    /// True for any 2xx status.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// True when the response is scoped to one user: it sets a cookie or
    /// its `Cache-Control` says `private` or `no-store`.
    pub fn is_private(&self) -> bool {
        if self.headers.contains_key(header::SET_COOKIE) {
            return true;
        }

        self.headers
            .get_all(header::CACHE_CONTROL)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|directive| directive.trim().to_ascii_lowercase())
            .any(|directive| directive == "private" || directive == "no-store")
    }

    /// Copy of the response without `Set-Cookie`, safe to replay to anyone.
    pub fn without_cookies(mut self) -> Self {
        self.headers.remove(header::SET_COOKIE);
        self
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        for (name, value) in self.headers.iter() {
            if HOP_BY_HOP.contains(&name.as_str()) {
                continue;
            }
            headers.append(name.clone(), value.clone());
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_page_is_html() {
        let response = FetchResponse::offline_page();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers[header::CONTENT_TYPE], "text/html");
        assert!(response.body_text().contains("You are offline"));
    }

    #[test]
    fn test_offline_text_body() {
        let response = FetchResponse::offline_text();
        assert_eq!(response.body_text(), "Offline");
        assert_eq!(response.response_type, ResponseType::Default);
    }

    #[test]
    fn test_is_cacheable_requires_basic_200() {
        assert!(FetchResponse::new(StatusCode::OK, ResponseType::Basic, "x").is_cacheable());
        assert!(!FetchResponse::new(StatusCode::OK, ResponseType::Cors, "x").is_cacheable());
        assert!(!FetchResponse::new(StatusCode::NOT_FOUND, ResponseType::Basic, "x").is_cacheable());
        assert!(!FetchResponse::new(StatusCode::NO_CONTENT, ResponseType::Basic, "").is_cacheable());
    }

    #[test]
    fn test_is_private() {
        let public = FetchResponse::new(StatusCode::OK, ResponseType::Basic, "x")
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("public, max-age=60"));
        assert!(!public.is_private());

        let cookie = FetchResponse::new(StatusCode::OK, ResponseType::Basic, "x")
            .with_header(header::SET_COOKIE, HeaderValue::from_static("session=abc"));
        assert!(cookie.is_private());
        assert!(!cookie.without_cookies().is_private());

        let private = FetchResponse::new(StatusCode::OK, ResponseType::Basic, "x")
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0, Private"));
        assert!(private.is_private());

        let no_store = FetchResponse::new(StatusCode::OK, ResponseType::Basic, "x")
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        assert!(no_store.is_private());
    }

    #[test]
    fn test_into_response_strips_hop_by_hop_headers() {
        let response = FetchResponse::new(StatusCode::OK, ResponseType::Basic, "body")
            .with_header(header::CONNECTION, HeaderValue::from_static("keep-alive"))
            .with_header(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .into_response();

        assert!(response.headers().get(header::CONNECTION).is_none());
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    }
}
