//! Answer composition: direct aggregates for recognized intents, generative
//! fallback for everything else.

pub mod aggregate;
pub mod composer;
pub mod intent;

pub use composer::{Answer, AnswerComposer, AnswerKind};
pub use intent::Intent;
