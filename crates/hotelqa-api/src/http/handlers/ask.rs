//! Question answering endpoint.
//!
//! POST /api/v1/ask - Retrieve context for a question and compose an answer.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use hotelqa_core::answer::AnswerKind;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for POST /api/v1/ask.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    /// Overrides `retrieval.ask_top_k` from the config.
    pub top_k: Option<usize>,
}

/// Response payload for POST /api/v1/ask.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub kind: AnswerKind,
    /// Number of records the answer was composed from.
    pub retrieved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_key: Option<String>,
}

/// Validate an ask request against the configured default depth.
pub fn validate(body: &AskRequest, default_top_k: usize) -> Result<(String, usize), AppError> {
    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question must not be empty".to_string()));
    }
    let top_k = body.top_k.unwrap_or(default_top_k);
    if top_k == 0 {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }
    Ok((question.to_string(), top_k))
}

/// POST /api/v1/ask
pub async fn ask(
    State(state): State<AppState>,
    Json(body): Json<AskRequest>,
) -> Result<Json<ApiResponse<AskResponse>>, AppError> {
    let start = Instant::now();
    let (question, top_k) = validate(&body, state.config.retrieval.ask_top_k)?;

    let (answer, retrieval) = state.ask(&question, top_k).await?;

    Ok(Json(ApiResponse::success(
        AskResponse {
            answer: answer.text,
            kind: answer.kind,
            retrieved: retrieval.len(),
            filter_key: retrieval.filter_key,
        },
        start,
    )))
}
