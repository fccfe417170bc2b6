//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding booking summaries and questions into
//! dense vectors. Implementations (e.g., fastembed local models) live in
//! hotelqa-infra.

use hotelqa_types::error::RepositoryError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations must be deterministic for a fixed model and input, and
/// must return an empty result for an empty batch without invoking the model.
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns one vector per input text, each of length [`Embedder::dimension`].
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, RepositoryError>> + Send;

    /// The model name used for embeddings (e.g., "all-MiniLM-L6-v2").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
