//! Document upload

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use wfa_common::api::UploadResponse;

use crate::error::{ApiError, ApiResult, IngestError};
use crate::ingest::MediaType;
use crate::AppState;

/// Multipart field carrying the document
pub const FILE_FIELD: &str = "file";

/// POST /api/upload
///
/// Multipart form with a `file` field whose `Content-Type` is `text/plain`
/// or `application/pdf`. Responds with the id of the stored analysis.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        // Reject before the body is read
        content_type.parse::<MediaType>()?;

        let bytes = field.bytes().await.map_err(unreadable)?;
        let id = state.ingestor.ingest(bytes, &content_type).await?;
        return Ok(Json(UploadResponse { id }));
    }

    Err(ApiError::BadRequest(format!(
        "missing multipart field '{}'",
        FILE_FIELD
    )))
}

fn malformed(e: MultipartError) -> ApiError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(e.body_text()),
        _ => ApiError::BadRequest(e.body_text()),
    }
}

fn unreadable(e: MultipartError) -> ApiError {
    match e.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(e.body_text()),
        _ => IngestError::Read(e.body_text()).into(),
    }
}
