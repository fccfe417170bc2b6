//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use hotelqa_types::error::{DatasetError, RepositoryError, RetrievalError};

use crate::http::response::ApiResponse;
use crate::state::KnowledgeError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Knowledge base loading, rebuilding, or retrieval failed.
    Knowledge(KnowledgeError),
    /// Analytics storage failed.
    Repository(RepositoryError),
    /// Request validation failed.
    Validation(String),
}

impl From<KnowledgeError> for AppError {
    fn from(e: KnowledgeError) -> Self {
        AppError::Knowledge(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    /// Status code and machine-readable code for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Knowledge(KnowledgeError::IndexMissing(_))
            | AppError::Knowledge(KnowledgeError::Dataset(DatasetError::NotFound(_))) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_READY")
            }
            AppError::Knowledge(KnowledgeError::Retrieval(RetrievalError::Embedding(_)))
            | AppError::Knowledge(KnowledgeError::Embedder(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "EMBEDDING_ERROR")
            }
            AppError::Knowledge(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INDEX_ERROR"),
            AppError::Repository(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Knowledge(e) => e.to_string(),
            AppError::Repository(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        }

        (status, Json(ApiResponse::error(code, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("question must not be empty".into());
        assert_eq!(err.status(), (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_index_maps_to_unavailable() {
        let err = AppError::from(KnowledgeError::IndexMissing("/tmp/index".into()));
        assert_eq!(err.status().0, StatusCode::SERVICE_UNAVAILABLE);

        let err = AppError::from(KnowledgeError::Dataset(DatasetError::NotFound("x.csv".into())));
        assert_eq!(err.status().0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_repository_error_is_internal() {
        let err = AppError::from(RepositoryError::Query("disk I/O error".into()));
        assert_eq!(err.status(), (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"));
    }
}
