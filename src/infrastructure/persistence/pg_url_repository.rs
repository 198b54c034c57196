//! PostgreSQL implementation of the durable URL store.

use async_trait::async_trait;
use sqlx::PgPool;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::domain::StorageError;
use crate::domain::repositories::UrlRepository;

/// PostgreSQL repository over the `urls` table.
///
/// `short_url` is the primary key, so the database arbitrates concurrent
/// inserts of the same code: the loser receives a unique violation (`23505`),
/// reported as [`StorageError::AlreadyExists`].
///
/// Every query is bounded by `query_timeout`; exceeding it yields
/// [`StorageError::Timeout`] and drops the in-flight query.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, query: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(map_sqlx_error),
            Err(_) => {
                warn!(timeout = ?self.query_timeout, "Database query timed out");
                Err(StorageError::Timeout(self.query_timeout))
            }
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn get_by_key(&self, key: &str) -> Result<String, StorageError> {
        let row = self
            .bounded(
                sqlx::query_scalar::<_, String>("SELECT long_url FROM urls WHERE short_url = $1")
                    .bind(key)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        row.ok_or(StorageError::NotFound)
    }

    async fn insert_if_absent(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.bounded(
            sqlx::query("INSERT INTO urls (short_url, long_url) VALUES ($1, $2)")
                .bind(key)
                .bind(value)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}

/// Maps driver errors onto the storage taxonomy.
///
/// Unique violations become [`StorageError::AlreadyExists`], missing rows
/// become [`StorageError::NotFound`], everything else is a backend failure.
pub fn map_sqlx_error(e: sqlx::Error) -> StorageError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StorageError::AlreadyExists;
    }

    match e {
        sqlx::Error::RowNotFound => StorageError::NotFound,
        sqlx::Error::PoolTimedOut => StorageError::Backend("connection pool timed out".into()),
        other => StorageError::Backend(other.to_string()),
    }
}
