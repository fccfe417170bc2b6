//! SQLite storage via sqlx.

pub mod analytics;
pub mod pool;
