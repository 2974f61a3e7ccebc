//! # Database Persistence Layer
//!
//! Provides Postgres persistence for issued licenses via SQLx.
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, every
//! issued license is written through to the `licenses` table and the
//! in-memory store is hydrated from it at startup. When absent, the API
//! operates in in-memory-only mode (suitable for development and testing).
//!
//! The `licenses` table carries a `UNIQUE` constraint on `key` — the
//! durable backstop for the uniqueness the in-memory store enforces.

pub mod licenses;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 Issued licenses will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}
