//! Precomputed analytics endpoints.
//!
//! POST /api/v1/analytics/query - Answer a keyword question from stored values.
//! GET  /api/v1/analytics       - All stored values.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Message returned when no analytics phrase matches the question.
pub const QUERY_NOT_RECOGNIZED: &str = "Query not recognized. Please try a different question.";

/// Request body for POST /api/v1/analytics/query.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub question: String,
}

/// POST /api/v1/analytics/query
///
/// Responds with a single-entry `{key: value}` map.
pub async fn query_analytics(
    State(state): State<AppState>,
    Json(body): Json<AnalyticsQuery>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    let start = Instant::now();

    let (key, value) = state
        .analytics_service
        .query(&body.question)
        .await?
        .ok_or_else(|| AppError::Validation(QUERY_NOT_RECOGNIZED.to_string()))?;

    let data = BTreeMap::from([(key.as_str().to_string(), value)]);
    Ok(Json(ApiResponse::success(data, start)))
}

/// GET /api/v1/analytics
pub async fn list_analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BTreeMap<String, String>>>, AppError> {
    let start = Instant::now();
    let snapshot = state.analytics_service.snapshot().await?;
    Ok(Json(ApiResponse::success(snapshot, start)))
}
