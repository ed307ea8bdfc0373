//! Analysis retrieval

use axum::{
    extract::{Path, State},
    Json,
};
use wfa_common::api::Analysis;

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/analysis/:id
///
/// Returns the stored analysis, or 404 when the id is unknown.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Analysis>> {
    let analysis = state.store.get(&id).await?;
    Ok(Json(Analysis::clone(&analysis)))
}
