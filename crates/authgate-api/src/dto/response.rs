//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authgate_entity::user::User;

/// Login/refresh response. The refresh token travels in a scoped cookie,
/// never in this body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Access token for the Authorization header.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Always `bearer`.
    pub token_type: String,
    /// The authenticated user.
    pub user: UserResponse,
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The authenticated caller, as echoed by `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityResponse {
    /// Caller's user ID.
    pub user_id: Uuid,
    /// Caller's role.
    pub role: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health probe response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the process is serving.
    pub status: String,
}
