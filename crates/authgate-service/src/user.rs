//! User lifecycle with self-ownership policy grants.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use authgate_auth::password::PasswordHasher;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::user_store::UserStore;
use authgate_core::types::pagination::{PageRequest, PageResponse};
use authgate_entity::user::{NewUser, User, UserRole};
use authgate_policy::backend::PolicyBackend;

/// Grants every new user receives: ownership of their own profile resource
/// plus baseline read access to the user directory and stream resources.
fn default_grants(user_id: Uuid) -> Vec<(String, &'static str)> {
    let owned = format!("users/{user_id}");
    vec![
        (owned.clone(), "read"),
        (owned.clone(), "write"),
        (owned, "delete"),
        ("users".to_string(), "read"),
        ("stream".to_string(), "read"),
        ("stream".to_string(), "write"),
    ]
}

/// Orchestrates the credential store, password hashing, and policy grants.
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<PasswordHasher>,
    policy: Arc<dyn PolicyBackend>,
    write_deadline: Duration,
}

impl UserService {
    /// Creates the service over its collaborators.
    pub fn new(
        store: Arc<dyn UserStore>,
        hasher: Arc<PasswordHasher>,
        policy: Arc<dyn PolicyBackend>,
        write_deadline: Duration,
    ) -> Self {
        Self {
            store,
            hasher,
            policy,
            write_deadline,
        }
    }

    /// Registers a new user and installs their self-ownership grants.
    ///
    /// Grant installation uses the idempotent ensure operation; a failed
    /// grant is logged and skipped rather than rolling back the user row.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        role: Option<UserRole>,
    ) -> AppResult<User> {
        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .store
            .create(NewUser {
                email: email.to_string(),
                password_hash,
                role: role.unwrap_or_default(),
            })
            .await?;

        let subject = user.id.to_string();
        for (object, action) in default_grants(user.id) {
            if let Err(e) = self
                .policy
                .add_policy_if_not_exists(&subject, &object, action, self.write_deadline)
                .await
            {
                warn!(error = %e, %subject, %object, action, "failed to install grant");
            }
        }

        Ok(user)
    }

    /// Deletes a user and removes the grants installed at creation time,
    /// symmetrically.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            let subject = id.to_string();
            for (object, action) in default_grants(id) {
                if let Err(e) = self
                    .policy
                    .remove_policy(&subject, &object, action, self.write_deadline)
                    .await
                {
                    warn!(error = %e, %subject, %object, action, "failed to revoke grant");
                }
            }
        }
        Ok(deleted)
    }

    /// Fetches a user, erroring when absent.
    pub async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Fetches a user without mapping absence to an error.
    pub async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.store.get_by_id(id).await
    }

    /// Lists users, newest first.
    pub async fn list_users(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        self.store.list(page).await
    }

    /// Updates a user's email.
    pub async fn update_email(&self, id: Uuid, email: &str) -> AppResult<User> {
        self.store
            .update_email(id, email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Checks a login attempt against the stored hash.
    ///
    /// Unknown email and wrong password produce the same error so callers
    /// cannot enumerate accounts.
    pub async fn validate_credentials(&self, email: &str, password: &str) -> AppResult<User> {
        let user = self
            .store
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::authentication("invalid credentials"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::authentication("invalid credentials"));
        }
        Ok(user)
    }

    /// Replaces the user's token version, revoking all outstanding refresh
    /// tokens issued under the previous value.
    pub async fn update_token_version(&self, id: Uuid, version: &str) -> AppResult<()> {
        self.store.update_token_version(id, version).await
    }
}
