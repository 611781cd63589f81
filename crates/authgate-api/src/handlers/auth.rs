//! Auth handlers — login, refresh, logout, logout-all, me, public key.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use authgate_core::error::AppError;
use authgate_entity::user::User;

use crate::dto::request::LoginRequest;
use crate::dto::response::{IdentityResponse, LoginResponse, MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Cookie carrying the refresh token, scoped to the refresh endpoint.
pub const REFRESH_COOKIE: &str = "refresh_token";
/// Path the refresh cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/api/auth/refresh";

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let (user, pair) = state.auth_service.login(&req.email, &req.password).await?;

    let jar = jar.add(refresh_cookie(&state, pair.refresh_token.clone()));
    Ok((jar, Json(login_response(user, pair))))
}

/// POST /api/auth/refresh
///
/// The refresh token arrives in its scoped cookie, never in the body.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::authentication("refresh token required"))?;

    let (user, pair) = state.auth_service.refresh(&token).await?;

    let jar = jar.add(refresh_cookie(&state, pair.refresh_token.clone()));
    Ok((jar, Json(login_response(user, pair))))
}

/// POST /api/auth/logout
///
/// Clears the refresh cookie for this browser session. Other sessions and
/// the token itself are untouched; use logout-all for full revocation.
pub async fn logout(jar: CookieJar) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    let jar = jar.remove(removal_cookie());
    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// POST /api/auth/logout_all
///
/// Bumps the caller's token version: every outstanding refresh token fails
/// the version comparison from now on, regardless of remaining lifetime.
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    state.auth_service.logout_all(auth.user_id).await?;

    let jar = jar.remove(removal_cookie());
    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out from all devices".to_string(),
        }),
    ))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> ApiResult<Json<IdentityResponse>> {
    Ok(Json(IdentityResponse {
        user_id: auth.user_id,
        role: auth.role.to_string(),
    }))
}

/// GET /api/auth/public_key
///
/// PEM export of the access public key so third parties can verify access
/// tokens without calling back.
pub async fn public_key(State(state): State<AppState>) -> String {
    state.token_service.public_key_pem().to_string()
}

fn login_response(user: User, pair: authgate_auth::token::TokenPair) -> LoginResponse {
    LoginResponse {
        access_token: pair.access_token,
        expires_in: pair.expires_in,
        token_type: pair.token_type,
        user: UserResponse::from(user),
    }
}

fn refresh_cookie(state: &AppState, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, value);
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(
        state.token_service.refresh_expiry().as_secs() as i64,
    ));
    let domain = &state.config.auth.cookie_domain;
    if !domain.is_empty() {
        cookie.set_domain(domain.clone());
    }
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(REFRESH_COOKIE, "");
    cookie.set_path(REFRESH_COOKIE_PATH);
    cookie
}
