//! Circuit-breaker guard shared by the repositories.

use authgate_core::error::{AppError, ErrorKind};
use authgate_core::result::AppResult;
use authgate_policy::breaker::{BreakerError, CircuitBreaker};

/// Runs a query future under the repository's breaker.
///
/// An open breaker surfaces as `ServiceUnavailable` without touching the
/// database; query errors are mapped into `AppError` with unique-violation
/// detection so duplicate inserts become conflicts.
pub(crate) async fn guarded<T>(
    breaker: &CircuitBreaker,
    what: &str,
    fut: impl Future<Output = Result<T, sqlx::Error>>,
) -> AppResult<T> {
    match breaker.call(fut).await {
        Ok(value) => Ok(value),
        Err(BreakerError::Open) => Err(AppError::service_unavailable(format!(
            "{what}: database circuit breaker open"
        ))),
        Err(BreakerError::Inner(e)) => Err(map_db_error(what, e)),
    }
}

fn map_db_error(what: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // 23505 = unique_violation
        if db_err.code().as_deref() == Some("23505") {
            return AppError::conflict(format!("{what}: duplicate entry"));
        }
    }
    AppError::with_source(ErrorKind::Database, what.to_string(), e)
}
