//! Claim sets embedded in access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authgate_core::error::AppError;
use authgate_entity::user::UserRole;

/// Claims carried by an access token. Immutable once signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user ID as a string.
    pub sub: String,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Claims carried by a refresh token.
///
/// `token_version` is compared for equality against the stored user record
/// during the refresh flow; it is never ordered or interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject — the user ID as a string.
    pub sub: String,
    /// Revocation tag current at issuance time.
    pub token_version: String,
    /// Issuer.
    pub iss: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Parse the subject claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::authentication("invalid token"))
    }
}

impl RefreshClaims {
    /// Parse the subject claim as a user ID.
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::authentication("invalid token"))
    }
}
