//! Analytics repository trait definition.

use hotelqa_types::analytics::{AnalyticsEntry, AnalyticsKey};
use hotelqa_types::error::RepositoryError;

/// Storage for precomputed analytics values, one row per key.
pub trait AnalyticsRepository: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(
        &self,
        key: AnalyticsKey,
    ) -> impl std::future::Future<Output = Result<Option<AnalyticsEntry>, RepositoryError>> + Send;

    /// Insert or replace the value under `key`, stamping `updated_at`.
    fn upsert(
        &self,
        key: AnalyticsKey,
        value: &str,
    ) -> impl std::future::Future<Output = Result<AnalyticsEntry, RepositoryError>> + Send;

    /// All stored values, ordered by key.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<AnalyticsEntry>, RepositoryError>> + Send;
}
