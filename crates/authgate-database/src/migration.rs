//! Embedded schema migrations.

use sqlx::PgPool;

use authgate_core::error::{AppError, ErrorKind};

/// Runs all pending migrations from the embedded `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Migration failed", e))
}
