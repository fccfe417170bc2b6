//! Precomputed analytics: storage port, keyword routing, and the service
//! tying them together.

pub mod keywords;
pub mod repository;
pub mod service;

pub use keywords::match_keyword;
pub use repository::AnalyticsRepository;
pub use service::{AnalyticsService, ImportSummary};
