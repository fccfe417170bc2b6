//! Analytics service.
//!
//! Values are opaque strings computed elsewhere; this service only stores
//! them and answers keyword questions from what is stored.

use std::collections::BTreeMap;

use serde::Serialize;

use hotelqa_types::analytics::{AnalyticsEntry, AnalyticsKey};
use hotelqa_types::error::RepositoryError;

use super::keywords::match_keyword;
use super::repository::AnalyticsRepository;

/// Placeholder returned for a recognized key with no stored value.
pub const DATA_NOT_AVAILABLE: &str = "Data not available";

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub stored: usize,
    /// Keys in the input that are not recognized analytics keys.
    pub skipped: Vec<String>,
}

pub struct AnalyticsService<R: AnalyticsRepository> {
    repo: R,
}

impl<R: AnalyticsRepository> AnalyticsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Answer a keyword question.
    ///
    /// Returns `None` when no phrase matches. A matched key without a stored
    /// value yields [`DATA_NOT_AVAILABLE`].
    #[tracing::instrument(skip(self))]
    pub async fn query(&self, question: &str) -> Result<Option<(AnalyticsKey, String)>, RepositoryError> {
        let Some(key) = match_keyword(question) else {
            tracing::info!(recognized = false, "analytics query");
            return Ok(None);
        };

        let value = self
            .repo
            .get(key)
            .await?
            .map(|entry| entry.value)
            .unwrap_or_else(|| DATA_NOT_AVAILABLE.to_string());

        tracing::info!(recognized = true, key = %key, "analytics query");
        Ok(Some((key, value)))
    }

    /// All stored values as a key-to-value map.
    pub async fn snapshot(&self) -> Result<BTreeMap<String, String>, RepositoryError> {
        Ok(self
            .repo
            .list()
            .await?
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect())
    }

    /// All stored entries with timestamps.
    pub async fn entries(&self) -> Result<Vec<AnalyticsEntry>, RepositoryError> {
        self.repo.list().await
    }

    /// Store one value.
    pub async fn set(&self, key: AnalyticsKey, value: &str) -> Result<AnalyticsEntry, RepositoryError> {
        self.repo.upsert(key, value).await
    }

    /// Store every recognized key of `values`; unknown keys are skipped.
    pub async fn import(&self, values: BTreeMap<String, String>) -> Result<ImportSummary, RepositoryError> {
        let mut summary = ImportSummary::default();
        for (raw_key, value) in values {
            match raw_key.parse::<AnalyticsKey>() {
                Ok(key) => {
                    self.repo.upsert(key, &value).await?;
                    summary.stored += 1;
                }
                Err(_) => {
                    tracing::warn!(key = %raw_key, "skipping unrecognized analytics key");
                    summary.skipped.push(raw_key);
                }
            }
        }
        tracing::info!(stored = summary.stored, skipped = summary.skipped.len(), "analytics imported");
        Ok(summary)
    }
}
