//! Shared domain types for the hotel booking QA service.
//!
//! Booking records and their column schema, calendar periods, analytics keys,
//! LLM request/response shapes, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod analytics;
pub mod booking;
pub mod config;
pub mod error;
pub mod llm;
pub mod period;
