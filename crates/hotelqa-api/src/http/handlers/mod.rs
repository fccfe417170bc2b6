//! HTTP request handlers for the REST API.

pub mod analytics;
pub mod ask;
pub mod health;
pub mod index;
