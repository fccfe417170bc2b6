//! Offline embed-and-index build.
//!
//! Embeds the corpus `text` column in fixed-size batches and assembles the
//! position-aligned embedding matrix plus the [`FlatL2Index`] over it.

use hotelqa_types::error::{BuildError, IndexError};

use crate::embedding::Embedder;
use crate::retrieval::Corpus;

use super::flat::FlatL2Index;

/// Output of a build: the raw embedding matrix and the index over it.
#[derive(Debug, Clone)]
pub struct BuiltIndex {
    pub embeddings: Vec<Vec<f32>>,
    pub index: FlatL2Index,
}

/// Batched corpus embedder.
#[derive(Debug, Clone, Copy)]
pub struct IndexBuilder {
    batch_size: usize,
}

impl IndexBuilder {
    /// A zero batch size is clamped to one.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed every record of `corpus` and build the index.
    ///
    /// `on_progress` is called after each batch with the number of records
    /// embedded so far.
    #[tracing::instrument(skip_all, fields(records = corpus.len(), batch_size = self.batch_size))]
    pub async fn build<E, F>(
        &self,
        embedder: &E,
        corpus: &Corpus,
        mut on_progress: F,
    ) -> Result<BuiltIndex, BuildError>
    where
        E: Embedder,
        F: FnMut(usize),
    {
        let dimension = embedder.dimension();
        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(corpus.len());

        let texts: Vec<String> = corpus.records().iter().map(|r| r.text.clone()).collect();

        for (batch_no, batch) in texts.chunks(self.batch_size).enumerate() {
            let offset = batch_no * self.batch_size;
            let vectors = embedder
                .embed(batch)
                .await
                .map_err(|source| BuildError::Embedding { offset, source })?;

            if vectors.len() != batch.len() {
                return Err(BuildError::BatchSize {
                    expected: batch.len(),
                    actual: vectors.len(),
                });
            }

            for (i, vector) in vectors.iter().enumerate() {
                if vector.len() != dimension {
                    return Err(IndexError::DimensionMismatch {
                        expected: dimension,
                        actual: vector.len(),
                        position: offset + i,
                    }
                    .into());
                }
            }

            embeddings.extend(vectors);
            on_progress(embeddings.len());
        }

        let index = FlatL2Index::build(dimension, &embeddings)?;
        tracing::info!(
            vectors = index.len(),
            dimension,
            model = embedder.model_name(),
            "index built"
        );

        Ok(BuiltIndex { embeddings, index })
    }
}
