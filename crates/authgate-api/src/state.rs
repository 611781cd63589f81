//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use authgate_auth::token::TokenService;
use authgate_core::config::AppConfig;
use authgate_policy::backend::PolicyBackend;
use authgate_service::auth::AuthService;
use authgate_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Token issuer/validator.
    pub token_service: Arc<TokenService>,
    /// User lifecycle and credential checks.
    pub user_service: Arc<UserService>,
    /// Login/refresh/revoke-all flows.
    pub auth_service: Arc<AuthService>,
    /// Policy decisions, local or remote.
    pub policy: Arc<dyn PolicyBackend>,
}
