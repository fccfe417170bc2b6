use thiserror::Error;

use crate::booking::Column;

/// Errors from building, searching, or persisting the vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("dimension mismatch at position {position}: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        position: usize,
    },

    #[error("index dimension must be greater than zero")]
    ZeroDimension,

    #[error("corrupt index data: {0}")]
    Corrupt(String),

    #[error("index I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for IndexError {
    fn from(e: std::io::Error) -> Self {
        IndexError::Io(e.to_string())
    }
}

/// Errors from the offline embed-and-index build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to embed batch starting at record {offset}: {source}")]
    Embedding {
        offset: usize,
        #[source]
        source: RepositoryError,
    },

    #[error("embedder returned {actual} vectors for a batch of {expected}")]
    BatchSize { expected: usize, actual: usize },

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Errors from loading the bookings dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("failed to read dataset: {0}")]
    Read(String),

    #[error("invalid record at line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
}

/// Errors from repository and adapter operations (used by port traits in hotelqa-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("embedding error: {0}")]
    Embedding(String),
}

/// Errors from the retrieval pipeline.
///
/// Retrieval never fails because of the query text itself; these only
/// surface adapter failures.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to embed query: {0}")]
    Embedding(#[from] RepositoryError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("embedder returned no vector for the query")]
    EmptyEmbedding,
}

/// Recoverable answer-composition failures.
///
/// The `Display` output of each variant is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnswerError {
    #[error("No relevant data found.")]
    EmptyRetrieval,

    #[error("Error: '{0}' column is missing in retrieved data.")]
    SchemaMissingField(Column),

    #[error("No revenue data found for {0}.")]
    NoDataForPeriod(String),

    #[error("Unable to generate an answer at this time.")]
    GenerationFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_display() {
        let err = IndexError::DimensionMismatch {
            expected: 384,
            actual: 768,
            position: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("384"));
        assert!(msg.contains("768"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_schema_missing_field_names_column() {
        let err = AnswerError::SchemaMissingField(Column::Revenue);
        assert_eq!(
            err.to_string(),
            "Error: 'revenue' column is missing in retrieved data."
        );
    }

    #[test]
    fn test_generation_failure_hides_cause() {
        let err = AnswerError::GenerationFailure("connection refused".to_string());
        assert!(!err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_retrieval_error_from_index_error() {
        let err: RetrievalError = IndexError::ZeroDimension.into();
        assert_eq!(err.to_string(), "index dimension must be greater than zero");
    }
}
