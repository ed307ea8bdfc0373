//! API module for shared HTTP API types
//!
//! Contains ONLY serde types. Each service wraps them with its own framework
//! handlers (Axum).

pub mod types;

pub use types::{Analysis, ErrorBody, ErrorResponse, HealthResponse, UploadResponse, WordFrequency};
