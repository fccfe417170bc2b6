//! Business logic and port trait definitions for the hotel booking QA service.
//!
//! This crate defines the "ports" (embedder, LLM provider, analytics
//! repository) that the infrastructure layer implements, plus the retrieval
//! pipeline itself: the flat L2 vector index, time-period extraction, the
//! retriever, and the answer composer. It depends only on `hotelqa-types` --
//! never on `hotelqa-infra` or any database/IO crate.

pub mod analytics;
pub mod answer;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod period;
pub mod retrieval;
