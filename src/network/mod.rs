//! Network Module
//!
//! Request and response values that flow through the interceptor, and the
//! fetcher that talks to the real network.

mod fetcher;
mod request;
mod response;

pub use fetcher::{Fetcher, HttpFetcher};
pub use request::{cache_key, FetchRequest, RequestMode};
pub use response::{FetchResponse, ResponseType, OFFLINE_PAGE, OFFLINE_TEXT};
