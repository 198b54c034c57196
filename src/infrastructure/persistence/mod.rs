//! PostgreSQL persistence for the durable tier.
//!
//! - [`PgUrlRepository`] - `urls` table access with per-query deadlines
//! - [`connect_pool`] - pool construction and embedded migrations

pub mod pg_url_repository;

pub use pg_url_repository::{PgUrlRepository, map_sqlx_error};

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::config::Config;

/// Opens the connection pool described by `config` and applies migrations.
///
/// # Errors
///
/// Returns an error if no database URL is configured, the first connection
/// cannot be acquired within `DB_CONNECT_TIMEOUT`, or a migration fails.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("Tiered storage requires DATABASE_URL or DB_* variables")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}
