//! Typed request identity.
//!
//! The authorization gate attaches this value to the request after token
//! validation; handlers and downstream services receive it explicitly
//! instead of fishing role/subject strings out of an untyped context map.

use uuid::Uuid;

use authgate_auth::token::claims::AccessClaims;
use authgate_entity::user::UserRole;

/// The authenticated caller of the current request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// The caller's user ID, parsed from the subject claim.
    pub user_id: Uuid,
    /// The caller's role at token issuance time.
    pub role: UserRole,
    /// The raw validated claim set.
    pub claims: AccessClaims,
}

impl Identity {
    /// Builds the identity from a validated claim set.
    pub fn from_claims(claims: AccessClaims) -> Result<Self, authgate_core::error::AppError> {
        let user_id = claims.user_id()?;
        Ok(Self {
            user_id,
            role: claims.role,
            claims,
        })
    }

    /// The policy subject string for this caller.
    pub fn subject(&self) -> String {
        self.user_id.to_string()
    }
}
