//! Background Tasks Module
//!
//! Work spawned off the request path.
//!
//! # Tasks
//! - Cache write: stores a successful network response after it has been
//!   returned

mod cache_write;

pub use cache_write::spawn_cache_write;
