//! Policy client/engine error taxonomy.

use thiserror::Error;

/// Failures surfaced by policy backends.
///
/// A `false` permission result is not an error; these variants all describe
/// the policy machinery being unreachable or broken. The authorization gate
/// treats every variant as a rejection (fail closed) but logs them
/// distinctly from an explicit deny.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The caller-supplied deadline elapsed before the call completed.
    #[error("policy call deadline exceeded")]
    DeadlineExceeded,
    /// The circuit breaker is open; the call was not attempted.
    #[error("policy circuit breaker is open")]
    CircuitOpen,
    /// The RPC transport failed (connect, send, or decode).
    #[error("policy transport failure: {0}")]
    Transport(String),
    /// The remote policy service reported an error in its response body.
    #[error("policy service error: {0}")]
    Remote(String),
    /// The in-process engine failed (e.g. its backing store).
    #[error("policy engine failure: {0}")]
    Internal(String),
    /// The client has been closed; no further calls are accepted.
    #[error("policy client is closed")]
    Closed,
}
