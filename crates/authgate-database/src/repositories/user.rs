//! User repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::user_store::UserStore;
use authgate_core::types::pagination::{PageRequest, PageResponse};
use authgate_entity::user::{NewUser, User};
use authgate_policy::breaker::CircuitBreaker;

use crate::guard::guarded;

/// PostgreSQL-backed credential store.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
    breaker: Arc<CircuitBreaker>,
}

impl UserRepository {
    /// Create a new user repository with its injected breaker.
    pub fn new(pool: PgPool, breaker: Arc<CircuitBreaker>) -> Self {
        Self { pool, breaker }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        guarded(
            &self.breaker,
            "Failed to create user",
            sqlx::query_as::<_, User>(
                "INSERT INTO users (email, password_hash, role) \
                 VALUES ($1, $2, $3) RETURNING *",
            )
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        guarded(
            &self.breaker,
            "Failed to find user by id",
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        guarded(
            &self.breaker,
            "Failed to find user by email",
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = guarded(
            &self.breaker,
            "Failed to count users",
            sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
        )
        .await?;

        let users = guarded(
            &self.breaker,
            "Failed to list users",
            sqlx::query_as::<_, User>(
                "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update_email(&self, id: Uuid, email: &str) -> AppResult<Option<User>> {
        guarded(
            &self.breaker,
            "Failed to update user",
            sqlx::query_as::<_, User>(
                "UPDATE users SET email = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = guarded(
            &self.breaker,
            "Failed to delete user",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_token_version(&self, id: Uuid, version: &str) -> AppResult<()> {
        let result = guarded(
            &self.breaker,
            "Failed to update token version",
            sqlx::query("UPDATE users SET token_version = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(version)
                .execute(&self.pool),
        )
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }
}
