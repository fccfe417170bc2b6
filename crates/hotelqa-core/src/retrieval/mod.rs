//! Retrieval over the indexed booking corpus.

pub mod corpus;
pub mod knowledge;
pub mod retriever;

pub use corpus::Corpus;
pub use knowledge::KnowledgeBase;
pub use retriever::{Retrieval, Retriever};
