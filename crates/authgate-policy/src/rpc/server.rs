//! Axum router exposing the policy engine over the RPC boundary.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::routing::post;
use axum::Router;
use tracing::debug;

use crate::engine::PolicyEngine;

use super::types::{
    AddPolicyIfNotExistsResponse, AddPolicyResponse, CheckPermissionResponse, PolicyOpRequest,
    RemovePolicyResponse,
};
use super::{ADD_IF_NOT_EXISTS_PATH, ADD_PATH, CHECK_PATH, REMOVE_PATH};

/// Builds the policy RPC router around a shared engine.
pub fn build_rpc_router(engine: Arc<PolicyEngine>) -> Router {
    Router::new()
        .route(CHECK_PATH, post(check_permission))
        .route(ADD_PATH, post(add_policy))
        .route(REMOVE_PATH, post(remove_policy))
        .route(ADD_IF_NOT_EXISTS_PATH, post(add_policy_if_not_exists))
        .with_state(engine)
}

async fn check_permission(
    State(engine): State<Arc<PolicyEngine>>,
    Json(req): Json<PolicyOpRequest>,
) -> Json<CheckPermissionResponse> {
    let allowed = engine.check_permission(&req.subject, &req.object, &req.action);
    debug!(subject = %req.subject, object = %req.object, action = %req.action, allowed, "rpc check_permission");
    Json(CheckPermissionResponse {
        allowed,
        error: String::new(),
    })
}

async fn add_policy(
    State(engine): State<Arc<PolicyEngine>>,
    Json(req): Json<PolicyOpRequest>,
) -> Json<AddPolicyResponse> {
    match engine
        .add_policy(&req.subject, &req.object, &req.action)
        .await
    {
        Ok(added) => Json(AddPolicyResponse {
            added,
            error: String::new(),
        }),
        Err(e) => Json(AddPolicyResponse {
            added: false,
            error: e.to_string(),
        }),
    }
}

async fn remove_policy(
    State(engine): State<Arc<PolicyEngine>>,
    Json(req): Json<PolicyOpRequest>,
) -> Json<RemovePolicyResponse> {
    match engine
        .remove_policy(&req.subject, &req.object, &req.action)
        .await
    {
        Ok(removed) => Json(RemovePolicyResponse {
            removed,
            error: String::new(),
        }),
        Err(e) => Json(RemovePolicyResponse {
            removed: false,
            error: e.to_string(),
        }),
    }
}

async fn add_policy_if_not_exists(
    State(engine): State<Arc<PolicyEngine>>,
    Json(req): Json<PolicyOpRequest>,
) -> Json<AddPolicyIfNotExistsResponse> {
    match engine
        .add_policy_if_not_exists(&req.subject, &req.object, &req.action)
        .await
    {
        Ok(exists) => Json(AddPolicyIfNotExistsResponse {
            exists,
            error: String::new(),
        }),
        Err(e) => Json(AddPolicyIfNotExistsResponse {
            exists: false,
            error: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    async fn rpc(
        router: &Router,
        path: &str,
        subject: &str,
        object: &str,
        action: &str,
    ) -> serde_json::Value {
        let body = serde_json::json!({
            "subject": subject,
            "object": object,
            "action": action,
        });
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn check_reflects_added_policy() {
        let engine = Arc::new(PolicyEngine::new());
        let router = build_rpc_router(Arc::clone(&engine));

        let denied = rpc(&router, CHECK_PATH, "u1", "users/u1", "read").await;
        assert_eq!(denied["allowed"], false);

        let added = rpc(&router, ADD_PATH, "u1", "users/u1", "read").await;
        assert_eq!(added["added"], true);
        assert_eq!(added["error"], "");

        let allowed = rpc(&router, CHECK_PATH, "u1", "users/u1", "read").await;
        assert_eq!(allowed["allowed"], true);
    }

    #[tokio::test]
    async fn add_if_not_exists_reports_presence() {
        let engine = Arc::new(PolicyEngine::new());
        let router = build_rpc_router(engine);

        let first = rpc(&router, ADD_IF_NOT_EXISTS_PATH, "u1", "users", "read").await;
        assert_eq!(first["exists"], true);

        let second = rpc(&router, ADD_IF_NOT_EXISTS_PATH, "u1", "users", "read").await;
        assert_eq!(second["exists"], true);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let engine = Arc::new(PolicyEngine::new());
        let router = build_rpc_router(engine);

        rpc(&router, ADD_PATH, "u1", "users", "read").await;
        let removed = rpc(&router, REMOVE_PATH, "u1", "users", "read").await;
        assert_eq!(removed["removed"], true);

        let again = rpc(&router, REMOVE_PATH, "u1", "users", "read").await;
        assert_eq!(again["removed"], false);
        assert_eq!(again["error"], "");
    }
}
