//! The authorization gate — the single enforcement point every protected
//! request passes through.
//!
//! Per request: extract and validate the bearer token (failure → 401),
//! attach the typed identity to the request, resolve the concrete resource
//! name from the route, then ask the policy backend under a bounded
//! deadline. An explicit deny and an unreachable policy service both reject
//! with an identical 403 — the gate fails closed and leaks nothing about
//! which case occurred. The gate performs no writes.

use std::time::Duration;

use axum::extract::{RawPathParams, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};

use authgate_core::error::AppError;
use authgate_service::context::Identity;

use crate::error::ApiError;
use crate::extractors::auth::bearer_token;
use crate::state::AppState;

/// Per-route gate configuration: the base object and the action this route
/// performs on it.
#[derive(Clone)]
pub struct PermissionGate {
    state: AppState,
    object: &'static str,
    action: &'static str,
}

impl PermissionGate {
    /// Builds the gate state for one route.
    pub fn new(state: &AppState, object: &'static str, action: &'static str) -> Self {
        Self {
            state: state.clone(),
            object,
            action,
        }
    }
}

/// The gate middleware. Registered per route via
/// `axum::middleware::from_fn_with_state`.
pub async fn authorize(
    State(gate): State<PermissionGate>,
    params: RawPathParams,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| ApiError(AppError::authentication("missing bearer token")))?;

    let claims = gate.state.token_service.validate_access_token(token)?;
    let identity = Identity::from_claims(claims)?;
    request.extensions_mut().insert(identity.clone());

    // The object is `<base>/<id>` when the route carries a resource id.
    let object = match params.iter().find(|(key, _)| *key == "id") {
        Some((_, id)) => format!("{}/{}", gate.object, id),
        None => gate.object.to_string(),
    };

    let subject = identity.subject();
    let deadline = Duration::from_millis(gate.state.config.policy.check_deadline_ms);

    match gate
        .state
        .policy
        .check_permission(&subject, &object, gate.action, deadline)
        .await
    {
        Ok(true) => Ok(next.run(request).await),
        Ok(false) => {
            debug!(%subject, %object, action = gate.action, "permission denied");
            Err(ApiError(AppError::authorization("access denied")))
        }
        Err(e) => {
            warn!(error = %e, %subject, %object, action = gate.action, "policy backend unavailable, failing closed");
            Err(ApiError(AppError::authorization("access denied")))
        }
    }
}
