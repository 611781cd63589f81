//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Account email (unique).
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Optional role; defaults to `member`.
    pub role: Option<String>,
}

/// Profile update request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New email.
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
}
