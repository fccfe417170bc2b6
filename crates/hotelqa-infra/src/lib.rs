//! Infrastructure layer for the hotel booking QA service.
//!
//! Contains implementations of the ports defined in `hotelqa-core`: the
//! fastembed embedder, the OpenAI-compatible LLM provider, and the SQLite
//! analytics repository. Also owns everything that touches the disk: the CSV
//! dataset loader, the durable index store, the config loader, and data
//! directory resolution.

pub mod config;
pub mod dataset;
pub mod embedder;
pub mod filesystem;
pub mod index_store;
pub mod llm;
pub mod sqlite;
