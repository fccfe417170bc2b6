//! Nearest-neighbor retrieval with an optional `year_month` filter.

use std::sync::Arc;

use serde::Serialize;

use hotelqa_types::booking::{BookingRecord, ColumnSet};
use hotelqa_types::error::RetrievalError;

use crate::embedding::BoxEmbedder;
use crate::period::extract_year_month;

use super::knowledge::KnowledgeBase;

/// Records retrieved for a query, nearest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Retrieval {
    pub records: Vec<BookingRecord>,
    /// Columns present in the corpus the records came from.
    pub columns: ColumnSet,
    /// The `YYYY-MM` key extracted from the query, if any.
    pub filter_key: Option<String>,
    /// True when no top-k candidate matched the key and every corpus record
    /// with that key was returned instead.
    pub fell_back: bool,
}

impl Retrieval {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Embeds questions and looks them up in a [`KnowledgeBase`].
pub struct Retriever {
    embedder: Arc<BoxEmbedder>,
    knowledge: Arc<KnowledgeBase>,
}

impl Retriever {
    pub fn new(embedder: Arc<BoxEmbedder>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            embedder,
            knowledge,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Retrieve up to `top_k` records relevant to `query`.
    ///
    /// When the query names an adjacent "Month YYYY", candidates are narrowed
    /// to that `year_month`; if none survive, the whole corpus is scanned for
    /// the key instead (which may return more than `top_k` records).
    #[tracing::instrument(skip(self), fields(corpus = self.knowledge.len()))]
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Retrieval, RetrievalError> {
        let vector = self
            .embedder
            .embed_one(query)
            .await?
            .ok_or(RetrievalError::EmptyEmbedding)?;

        let corpus = self.knowledge.corpus();
        let neighbors = self.knowledge.index().search(&vector, top_k)?;
        let candidates: Vec<&BookingRecord> = neighbors
            .iter()
            .filter_map(|n| corpus.get(n.position))
            .collect();
        let candidate_count = candidates.len();

        let filter_key = extract_year_month(query);
        let mut fell_back = false;

        let records: Vec<BookingRecord> = match filter_key.as_deref() {
            Some(key) => {
                let matched: Vec<BookingRecord> = candidates
                    .into_iter()
                    .filter(|r| r.year_month == key)
                    .cloned()
                    .collect();
                if matched.is_empty() {
                    fell_back = true;
                    corpus.with_year_month(key).cloned().collect()
                } else {
                    matched
                }
            }
            None => candidates.into_iter().cloned().collect(),
        };

        tracing::info!(
            query,
            top_k,
            candidates = candidate_count,
            returned = records.len(),
            filter_key = filter_key.as_deref().unwrap_or(""),
            fell_back,
            "retrieval complete"
        );

        Ok(Retrieval {
            records,
            columns: corpus.columns().clone(),
            filter_key,
            fell_back,
        })
    }
}
