//! Durable policy tuple store.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use authgate_core::result::AppResult;
use authgate_entity::policy::PolicyTuple;
use authgate_policy::breaker::CircuitBreaker;
use authgate_policy::store::PolicyStore;

use crate::guard::guarded;

/// PostgreSQL mirror of the policy relation.
#[derive(Clone)]
pub struct PolicyRepository {
    pool: PgPool,
    breaker: Arc<CircuitBreaker>,
}

impl PolicyRepository {
    /// Create a new policy repository with its injected breaker.
    pub fn new(pool: PgPool, breaker: Arc<CircuitBreaker>) -> Self {
        Self { pool, breaker }
    }
}

#[async_trait]
impl PolicyStore for PolicyRepository {
    async fn load_all(&self) -> AppResult<Vec<PolicyTuple>> {
        guarded(
            &self.breaker,
            "Failed to load policies",
            sqlx::query_as::<_, PolicyTuple>("SELECT subject, object, action FROM policies")
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn insert(&self, tuple: &PolicyTuple) -> AppResult<()> {
        guarded(
            &self.breaker,
            "Failed to insert policy",
            sqlx::query(
                "INSERT INTO policies (subject, object, action) \
                 VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(&tuple.subject)
            .bind(&tuple.object)
            .bind(&tuple.action)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, tuple: &PolicyTuple) -> AppResult<()> {
        guarded(
            &self.breaker,
            "Failed to delete policy",
            sqlx::query("DELETE FROM policies WHERE subject = $1 AND object = $2 AND action = $3")
                .bind(&tuple.subject)
                .bind(&tuple.object)
                .bind(&tuple.action)
                .execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}
