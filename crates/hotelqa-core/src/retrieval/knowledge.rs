//! The loaded corpus and its index, shared read-only across requests.

use std::sync::Arc;

use hotelqa_types::error::IndexError;

use crate::index::FlatL2Index;

use super::corpus::Corpus;

/// A corpus together with the index built over it.
///
/// Cheap to clone; readers hold an `Arc` for the duration of a request so a
/// rebuild can swap in a new knowledge base without disturbing them.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    corpus: Arc<Corpus>,
    index: Arc<FlatL2Index>,
}

impl KnowledgeBase {
    /// Pair a corpus with its index. Both must have the same length.
    pub fn new(corpus: Corpus, index: FlatL2Index) -> Result<Self, IndexError> {
        if corpus.len() != index.len() {
            return Err(IndexError::Corrupt(format!(
                "index holds {} vectors but the corpus has {} records",
                index.len(),
                corpus.len()
            )));
        }
        Ok(Self {
            corpus: Arc::new(corpus),
            index: Arc::new(index),
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &FlatL2Index {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use hotelqa_types::booking::{BookingRecord, ColumnSet};

    use super::*;

    #[test]
    fn test_length_mismatch_rejected() {
        let corpus = Corpus::new(vec![BookingRecord::default()], ColumnSet::all());
        let index = FlatL2Index::build(2, &[vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        assert!(matches!(
            KnowledgeBase::new(corpus, index),
            Err(IndexError::Corrupt(_))
        ));
    }

    #[test]
    fn test_new_accepts_aligned() {
        let corpus = Corpus::new(vec![BookingRecord::default()], ColumnSet::all());
        let index = FlatL2Index::build(2, &[vec![0.0, 0.0]]).unwrap();
        let kb = KnowledgeBase::new(corpus, index).unwrap();
        assert_eq!(kb.len(), 1);
        assert_eq!(kb.index().dimension(), 2);
    }
}
