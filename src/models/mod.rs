//! Request and Response models for the worker admin API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SyncRequest;
pub use responses::{GenerationInfo, HealthResponse, StatusResponse, SyncResponse};
