//! Login, refresh, and revoke-all flows.

use std::sync::Arc;

use uuid::Uuid;

use authgate_auth::token::{TokenPair, TokenService};
use authgate_auth::version::new_token_version;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_entity::user::User;

use crate::user::UserService;

/// Cross-component authentication protocol: ties the token service to the
/// credential store for issuance, refresh, and revocation.
pub struct AuthService {
    tokens: Arc<TokenService>,
    users: Arc<UserService>,
}

impl AuthService {
    /// Creates the service over its collaborators.
    pub fn new(tokens: Arc<TokenService>, users: Arc<UserService>) -> Self {
        Self { tokens, users }
    }

    /// Verifies credentials and mints a token pair.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, TokenPair)> {
        let user = self.users.validate_credentials(email, password).await?;
        let pair = self.tokens.generate_token(&user)?;
        Ok((user, pair))
    }

    /// Exchanges a refresh token for a fresh pair.
    ///
    /// The claimed `token_version` must equal the stored one; any mismatch
    /// is reported as the same authentication error as a bad token, so
    /// callers cannot distinguish revoked from invalid. The presented
    /// refresh token stays cryptographically valid until its own expiry;
    /// only a version bump revokes it early.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(User, TokenPair)> {
        let claims = self.tokens.validate_refresh_token(refresh_token)?;
        let user_id = claims.user_id()?;

        let user = self
            .users
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::authentication("invalid token"))?;

        if user.token_version != claims.token_version {
            return Err(AppError::authentication("invalid token"));
        }

        let pair = self.tokens.generate_token(&user)?;
        Ok((user, pair))
    }

    /// Logs the user out of every session by bumping their token version.
    pub async fn logout_all(&self, user_id: Uuid) -> AppResult<()> {
        self.users
            .update_token_version(user_id, &new_token_version())
            .await
    }
}
