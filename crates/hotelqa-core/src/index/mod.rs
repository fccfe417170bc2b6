//! Vector index over the booking corpus.

pub mod builder;
pub mod flat;

pub use builder::{BuiltIndex, IndexBuilder};
pub use flat::{FlatL2Index, Neighbor};
