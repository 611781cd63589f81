//! Credential store contract.
//!
//! The serving process treats user persistence as an external collaborator
//! behind this trait; the Postgres implementation lives in
//! `authgate-database`, and tests substitute an in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use authgate_entity::user::{NewUser, User};

use crate::result::AppResult;
use crate::types::pagination::{PageRequest, PageResponse};

/// Persistence contract for user records.
///
/// `token_version` is the sole revocation primitive: the stored value is
/// compared against the version embedded in refresh claims, and bumping it
/// invalidates every refresh token issued under the previous value.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user and return the stored record.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Look up a user by primary key.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by email (unique).
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>>;

    /// Update a user's email. Returns the updated record, or `None` if the
    /// user does not exist.
    async fn update_email(&self, id: Uuid, email: &str) -> AppResult<Option<User>>;

    /// Delete a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Replace a user's token version with a fresh value.
    async fn update_token_version(&self, id: Uuid, version: &str) -> AppResult<()>;
}
