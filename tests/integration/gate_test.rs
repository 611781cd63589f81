//! Integration tests for the authorization gate's failure behavior.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;

use authgate_policy::backend::PolicyBackend;
use authgate_policy::engine::PolicyEngine;
use authgate_policy::error::PolicyError;

use crate::helpers::TestApp;

/// Backend whose checks always time out; writes pretend to succeed so user
/// creation still works.
struct UnavailablePolicyBackend;

#[async_trait]
impl PolicyBackend for UnavailablePolicyBackend {
    async fn check_permission(
        &self,
        _subject: &str,
        _object: &str,
        _action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        Err(PolicyError::DeadlineExceeded)
    }

    async fn add_policy(
        &self,
        _subject: &str,
        _object: &str,
        _action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        Ok(true)
    }

    async fn remove_policy(
        &self,
        _subject: &str,
        _object: &str,
        _action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        Ok(true)
    }

    async fn add_policy_if_not_exists(
        &self,
        _subject: &str,
        _object: &str,
        _action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        Ok(true)
    }

    async fn close(&self) {}
}

#[tokio::test]
async fn gate_fails_closed_when_policy_is_unavailable() {
    let app = TestApp::with_policy(
        Arc::new(UnavailablePolicyBackend),
        Arc::new(PolicyEngine::new()),
    );
    app.create_test_user("u1@example.com", "password123").await;
    let (token, _) = app.login("u1@example.com", "password123").await;

    // A timed-out policy check must reject, never default-allow.
    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unavailable_policy_is_indistinguishable_from_deny() {
    let unavailable = TestApp::with_policy(
        Arc::new(UnavailablePolicyBackend),
        Arc::new(PolicyEngine::new()),
    );
    unavailable
        .create_test_user("u1@example.com", "password123")
        .await;
    let (token, _) = unavailable.login("u1@example.com", "password123").await;
    let outage = unavailable
        .request("GET", "/api/users", None, Some(&token))
        .await;

    let denying = TestApp::new();
    let id = denying
        .create_test_user("u1@example.com", "password123")
        .await;
    let (token, _) = denying.login("u1@example.com", "password123").await;
    denying
        .engine
        .remove_policy(&id.to_string(), "users", "read")
        .await
        .unwrap();
    let deny = denying.request("GET", "/api/users", None, Some(&token)).await;

    assert_eq!(outage.status, deny.status);
    assert_eq!(outage.body, deny.body);
}

#[tokio::test]
async fn missing_bearer_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/users", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_authorization_header_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/users", None, Some(""))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/users", None, Some("not.a.token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
