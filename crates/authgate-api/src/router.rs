//! Route definitions for the AuthGate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. Protected
//! routes are wrapped per-route with the authorization gate, which resolves
//! the concrete object from the route's `{id}` parameter.

use axum::{
    Router,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::authorize::{PermissionGate, authorize};
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(user_routes(&state))
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Auth endpoints: login, refresh, logout, logout-all, me, public key.
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/logout_all", post(handlers::auth::logout_all))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/public_key", get(handlers::auth::public_key))
}

/// User endpoints. Registration is public; everything else passes the gate
/// with the action this route performs on the `users` resource.
fn user_routes(state: &AppState) -> Router<AppState> {
    let read = Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/{id}", get(handlers::user::get_user))
        .route_layer(axum_middleware::from_fn_with_state(
            PermissionGate::new(state, "users", "read"),
            authorize,
        ));

    let write = Router::new()
        .route("/users/{id}", put(handlers::user::update_user))
        .route_layer(axum_middleware::from_fn_with_state(
            PermissionGate::new(state, "users", "write"),
            authorize,
        ));

    let remove = Router::new()
        .route("/users/{id}", delete(handlers::user::delete_user))
        .route_layer(axum_middleware::from_fn_with_state(
            PermissionGate::new(state, "users", "delete"),
            authorize,
        ));

    Router::new()
        .route("/users", post(handlers::user::create_user))
        .merge(read)
        .merge(write)
        .merge(remove)
}

/// Health endpoints under /api as well.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors_allowed_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let list: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(list))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
