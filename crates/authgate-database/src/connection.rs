//! Connection pool construction.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use authgate_core::config::database::DatabaseConfig;
use authgate_core::error::AppError;

/// Creates the PostgreSQL connection pool from configuration.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(&config.url)
        .await
        .map_err(|e| AppError::with_source(
            authgate_core::error::ErrorKind::Database,
            "Failed to connect to database",
            e,
        ))
}
