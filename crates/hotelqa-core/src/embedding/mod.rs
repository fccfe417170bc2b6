//! Text embedding abstractions.
//!
//! - `Embedder`: RPITIT trait for concrete embedding backends
//! - `BoxEmbedder`: object-safe wrapper for runtime selection

pub mod box_embedder;
pub mod embedder;

pub use box_embedder::BoxEmbedder;
pub use embedder::Embedder;
