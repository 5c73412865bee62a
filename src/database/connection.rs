//! Database connection management

use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::utils::errors::DeadlineBuddyError;

pub type DatabasePool = Pool<Postgres>;

/// Create a new database connection pool.
///
/// Failure here is fatal at startup: the bot does not run without durable
/// deadline storage.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, DeadlineBuddyError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Some(Duration::from_secs(600)))
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}
