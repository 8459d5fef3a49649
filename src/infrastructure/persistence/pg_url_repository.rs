//! PostgreSQL implementation of the URL record repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::{StoreError, map_insert_error};

/// PostgreSQL repository for URL records.
///
/// Uses SQLx prepared statements for SQL injection protection. Uniqueness of
/// `short_code` is enforced by the primary key.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRow {
    short_code: String,
    long_url: String,
    click_count: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord::new(
            r.short_code,
            r.long_url,
            r.click_count,
            r.created_at,
            r.expires_at,
        )
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT short_code, long_url, click_count, created_at, expires_at
            FROM urls
            WHERE short_code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (short_code, long_url, expires_at)
            VALUES ($1, $2, $3)
            RETURNING short_code, long_url, click_count, created_at, expires_at
            "#,
        )
        .bind(&new_record.short_code)
        .bind(&new_record.long_url)
        .bind(new_record.expires_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(e, &new_record.short_code))?;

        Ok(row.into())
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE urls SET click_count = click_count + 1 WHERE short_code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
