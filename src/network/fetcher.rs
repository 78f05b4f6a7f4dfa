//! Network Fetcher
//!
//! The seam between the interceptor and the real network. The proxy uses
//! [`HttpFetcher`]; tests substitute scripted implementations.

use async_trait::async_trait;
use axum::http::HeaderMap;
use tracing::debug;
use url::Url;

use crate::error::{CacheError, Result};
use crate::network::{FetchRequest, FetchResponse, ResponseType};

/// Request headers that are rewritten by the client and must not be forwarded.
const STRIPPED_REQUEST_HEADERS: [&str; 5] = [
    "host",
    "connection",
    "content-length",
    "transfer-encoding",
    "upgrade",
];

/// Issues requests over the network.
///
/// A rejected future (`Err`) means no response was received at all. HTTP error
/// statuses are successful fetches.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

// == HTTP Fetcher ==
/// Fetches over HTTP with reqwest, classifying responses against the
/// application origin.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin,
        }
    }

    fn classify(&self, url: &Url) -> ResponseType {
        if url.origin() == self.origin.origin() {
            ResponseType::Basic
        } else {
            ResponseType::Cors
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        debug!("Fetching {} {}", request.method, request.url);

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(forwardable_headers(&request.headers))
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Network(e.to_string()))?;

        Ok(FetchResponse {
            status,
            headers,
            body,
            response_type: self.classify(&final_url),
            url: Some(final_url),
        })
    }
}

fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in STRIPPED_REQUEST_HEADERS {
        forwarded.remove(name);
    }
    forwarded
}
