//! Index maintenance endpoint.
//!
//! POST /api/v1/index/rebuild - Re-embed the dataset and swap in the new index.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/index/rebuild
///
/// Runs to completion before responding. Requests served meanwhile keep using
/// the previous index.
pub async fn rebuild_index(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();

    let kb = state.rebuild_index(|_| {}).await?;

    let data = serde_json::json!({
        "records": kb.len(),
        "dimension": kb.index().dimension(),
        "columns": kb.corpus().columns().iter().map(|c| c.as_str()).collect::<Vec<_>>(),
    });

    Ok(Json(ApiResponse::success(data, start)))
}
