//! Error types for wfa-server
//!
//! [`IngestError`] is the analysis core's taxonomy; [`ApiError`] maps it (and
//! transport-only failures) onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use wfa_common::api::ErrorResponse;

/// Failures of ingestion and retrieval
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Declared media type is neither `text/plain` nor `application/pdf`
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Upload byte stream could not be fully consumed
    #[error("Read error: {0}")]
    Read(String),

    /// PDF is structurally malformed
    #[error("Decode error: {0}")]
    Decode(String),

    /// Identifier generator produced only ids that are already taken
    #[error("Identifier collision: {0}")]
    IdCollision(String),

    /// No analysis stored under the identifier
    #[error("Analysis not found: {0}")]
    NotFound(String),
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Core ingestion/retrieval failure
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Malformed request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload exceeds the configured size limit (413)
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Ingest(IngestError::UnsupportedMediaType(_)) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_MEDIA_TYPE")
            }
            ApiError::Ingest(IngestError::Read(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "READ_ERROR")
            }
            ApiError::Ingest(IngestError::Decode(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DECODE_ERROR")
            }
            ApiError::Ingest(IngestError::IdCollision(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ID_COLLISION")
            }
            ApiError::Ingest(IngestError::NotFound(_)) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse::new(code, self.to_string()))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
