//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is configured, the API
//! stores requirements, documents and versions in PostgreSQL. When absent,
//! the API runs against the in-memory backend (development and testing).
//!
//! Each submodule owns one table and exposes plain async functions taking a
//! `&PgPool`. Rows that carry soft-delete timestamps are filtered out of
//! every read.

pub mod documents;
pub mod requirements;
pub mod versions;

use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Connect a pool to `url`.
pub async fn init_pool(url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
