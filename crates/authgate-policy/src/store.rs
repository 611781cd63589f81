//! Durable backing store contract for policy tuples.

use async_trait::async_trait;

use authgate_core::result::AppResult;
use authgate_entity::policy::PolicyTuple;

/// Persistence contract behind the policy engine.
///
/// The engine keeps the authoritative relation in memory; the store is a
/// durable mirror loaded at startup. Implementations are expected to guard
/// their own downstream calls (the Postgres implementation wraps every
/// query in a circuit breaker).
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Load every stored tuple.
    async fn load_all(&self) -> AppResult<Vec<PolicyTuple>>;

    /// Persist a tuple. Inserting an already-present tuple is a no-op.
    async fn insert(&self, tuple: &PolicyTuple) -> AppResult<()>;

    /// Remove a tuple. Removing an absent tuple is a no-op.
    async fn delete(&self, tuple: &PolicyTuple) -> AppResult<()>;
}
