//! Integration tests for the authentication flow.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn login_success_sets_refresh_cookie() {
    let app = TestApp::new();
    app.create_test_user("u1@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "u1@example.com",
                "password": "password123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("access_token").is_some());
    assert_eq!(response.body["token_type"], "bearer");
    assert_eq!(response.body["expires_in"], 15 * 60);
    // The refresh token travels only in the scoped cookie.
    assert!(response.body.get("refresh_token").is_none());
    let cookie = response.refresh_cookie().expect("refresh cookie set");
    assert!(!cookie.is_empty());
}

#[tokio::test]
async fn login_invalid_password() {
    let app = TestApp::new();
    app.create_test_user("u1@example.com", "password123").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "u1@example.com",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_nonexistent_user_is_indistinguishable() {
    let app = TestApp::new();
    app.create_test_user("u1@example.com", "password123").await;

    let unknown = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": "password123",
            })),
            None,
        )
        .await;
    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "u1@example.com",
                "password": "nope",
            })),
            None,
        )
        .await;

    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], wrong.body["message"]);
}

#[tokio::test]
async fn me_roundtrip() {
    let app = TestApp::new();
    let id = app.create_test_user("u1@example.com", "password123").await;
    let (token, _) = app.login("u1@example.com", "password123").await;

    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user_id"], id.to_string());
    assert_eq!(response.body["role"], "member");

    let anonymous = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_key_is_exported_as_pem() {
    let app = TestApp::new();
    let response = app
        .request("GET", "/api/auth/public_key", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    // Body is plain PEM text, not JSON.
    assert!(response.text.contains("BEGIN PUBLIC KEY"));
}

#[tokio::test]
async fn refresh_rotates_the_pair() {
    let app = TestApp::new();
    app.create_test_user("u1@example.com", "password123").await;
    let (_, cookie) = app.login("u1@example.com", "password123").await;

    let response = app
        .request_with_cookie("POST", "/api/auth/refresh", &cookie)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("access_token").is_some());
    assert!(response.refresh_cookie().is_some());
}

#[tokio::test]
async fn refresh_without_cookie_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/refresh", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_with_garbage_cookie_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .request_with_cookie("POST", "/api/auth/refresh", "not-a-token")
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_all_revokes_old_refresh_tokens() {
    let app = TestApp::new();
    app.create_test_user("u1@example.com", "password123").await;
    let (token, cookie) = app.login("u1@example.com", "password123").await;

    // The token still refreshes before the bump.
    let before = app
        .request_with_cookie("POST", "/api/auth/refresh", &cookie)
        .await;
    assert_eq!(before.status, StatusCode::OK);

    let logout = app
        .request("POST", "/api/auth/logout_all", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    // Same cookie, still unexpired and correctly signed, now refused.
    let after = app
        .request_with_cookie("POST", "/api/auth/refresh", &cookie)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = TestApp::new();
    let response = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let cleared = response
        .headers
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("refresh_token=") && v.contains("Max-Age=0"));
    assert!(cleared);
}
