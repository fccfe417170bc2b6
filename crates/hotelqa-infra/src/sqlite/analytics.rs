//! SQLite analytics repository.
//!
//! Implements `AnalyticsRepository` from `hotelqa-core` on the `analytics`
//! table. Timestamps are stored as RFC 3339 text.

use chrono::{DateTime, Utc};
use sqlx::Row;

use hotelqa_core::analytics::AnalyticsRepository;
use hotelqa_types::analytics::{AnalyticsEntry, AnalyticsKey};
use hotelqa_types::error::RepositoryError;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `AnalyticsRepository`.
pub struct SqliteAnalyticsRepository {
    pool: DatabasePool,
}

impl SqliteAnalyticsRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AnalyticsRow {
    key: String,
    value: String,
    updated_at: String,
}

impl AnalyticsRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<AnalyticsEntry, RepositoryError> {
        Ok(AnalyticsEntry {
            key: self.key,
            value: self.value,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

impl AnalyticsRepository for SqliteAnalyticsRepository {
    async fn get(&self, key: AnalyticsKey) -> Result<Option<AnalyticsEntry>, RepositoryError> {
        let row = sqlx::query("SELECT key, value, updated_at FROM analytics WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let row =
                    AnalyticsRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(row.into_entry()?))
            }
            None => Ok(None),
        }
    }

    async fn upsert(&self, key: AnalyticsKey, value: &str) -> Result<AnalyticsEntry, RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            r#"INSERT INTO analytics (key, value, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key.as_str())
        .bind(value)
        .bind(now.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(AnalyticsEntry {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: now,
        })
    }

    async fn list(&self) -> Result<Vec<AnalyticsEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT key, value, updated_at FROM analytics ORDER BY key")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                AnalyticsRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_entry()
            })
            .collect()
    }
}
