//! wfa-server library - Word Frequency Analysis service
//!
//! Accepts plain-text and PDF uploads, ranks their word frequencies and keeps
//! the results in memory for retrieval by id.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod analysis;
pub mod api;
pub mod error;
pub mod ingest;
pub mod store;

pub use crate::error::{ApiError, ApiResult, IngestError};
pub use crate::ingest::{Ingestor, MediaType, PageFailurePolicy};
pub use crate::store::AnalysisStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide analysis store
    pub store: Arc<AnalysisStore>,
    /// Upload pipeline, committing into `store`
    pub ingestor: Arc<Ingestor>,
    /// Request body limit for uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Wire an ingestor to its store
    pub fn new(ingestor: Ingestor, max_upload_bytes: usize) -> Self {
        Self {
            store: Arc::clone(ingestor.store()),
            ingestor: Arc::new(ingestor),
            max_upload_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let upload = Router::new()
        .route("/api/upload", post(api::upload_document))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .merge(upload)
        .route("/api/analysis/:id", get(api::get_analysis))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
