//! PostgreSQL persistence for the spin backend.
//!
//! Repositories are zero-sized structs. Single-statement methods accept any
//! `PgExecutor`, so the same call works against `&PgPool` or `&mut *tx`.
//! Methods that issue several statements take `&mut PgConnection`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Bound how long the current transaction waits on row locks.
///
/// Must run inside an open transaction; `SET LOCAL` is discarded at commit or
/// rollback.
pub async fn set_lock_timeout(
    conn: &mut sqlx::PgConnection,
    timeout: Duration,
) -> Result<(), sqlx::Error> {
    // SET does not accept bind parameters.
    let millis = timeout.as_millis().max(1);
    sqlx::query(&format!("SET LOCAL lock_timeout = '{millis}ms'"))
        .execute(conn)
        .await?;
    Ok(())
}
