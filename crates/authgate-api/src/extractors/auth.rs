//! `AuthUser` extractor — the validated caller identity.
//!
//! On routes behind the authorization gate the identity is already attached
//! to the request; elsewhere the extractor validates the bearer token
//! itself.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use authgate_core::error::AppError;
use authgate_service::context::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated caller available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl std::ops::Deref for AuthUser {
    type Target = Identity;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(AuthUser(identity.clone()));
        }

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ApiError(AppError::authentication("missing bearer token")))?;

        let claims = state.token_service.validate_access_token(token)?;
        let identity = Identity::from_claims(claims)?;
        Ok(AuthUser(identity))
    }
}
