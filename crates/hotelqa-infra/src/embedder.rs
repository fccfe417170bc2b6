//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `hotelqa-core` using fastembed's
//! AllMiniLML6V2 model (384 dimensions) with ONNX runtime inference.
//! Inference is CPU-bound, so every call runs on the blocking thread pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use hotelqa_core::embedding::Embedder;
use hotelqa_types::error::RepositoryError;

/// Model identifier reported by [`FastEmbedder::model_name`].
pub const MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Output dimensionality of [`MODEL_NAME`].
pub const DIMENSION: usize = 384;

/// Local sentence embedder backed by fastembed.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Load the model, downloading it into `cache_dir` on first use.
    pub fn new(cache_dir: &Path) -> Result<Self, RepositoryError> {
        let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| RepositoryError::Embedding(format!("failed to load {MODEL_NAME}: {e}")))?;

        tracing::info!(model = MODEL_NAME, cache_dir = %cache_dir.display(), "embedding model loaded");

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RepositoryError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| RepositoryError::Embedding("embedding model lock poisoned".to_string()))?;
            model
                .embed(batch, None)
                .map_err(|e| RepositoryError::Embedding(e.to_string()))
        })
        .await
        .map_err(|e| RepositoryError::Embedding(format!("embedding task failed: {e}")))?
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }

    fn dimension(&self) -> usize {
        DIMENSION
    }
}
