//! Integration tests for policy grants and the authorization gate.

use axum::http::StatusCode;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
async fn new_user_owns_their_profile_resource() {
    let app = TestApp::new();
    let id = app.create_test_user("u2@example.com", "password123").await;
    let (token, _) = app.login("u2@example.com", "password123").await;

    // The self-ownership grant admits the owner.
    let own = app
        .request("GET", &format!("/api/users/{id}"), None, Some(&token))
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["email"], "u2@example.com");

    // A different caller has no grant on this resource.
    let other_id = app.create_test_user("u3@example.com", "password123").await;
    let (other_token, _) = app.login("u3@example.com", "password123").await;
    assert_ne!(other_id, id);

    let other = app
        .request("GET", &format!("/api/users/{id}"), None, Some(&other_token))
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn directory_read_grant_admits_list() {
    let app = TestApp::new();
    app.create_test_user("u2@example.com", "password123").await;
    let (token, _) = app.login("u2@example.com", "password123").await;

    let response = app.request("GET", "/api/users", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["items"].is_array());
}

#[tokio::test]
async fn subject_without_grants_is_denied() {
    let app = TestApp::new();

    // A correctly signed token whose subject has no tuples at all.
    let ghost = authgate_entity::user::User {
        id: Uuid::new_v4(),
        email: "ghost@example.com".to_string(),
        password_hash: String::new(),
        role: authgate_entity::user::UserRole::Member,
        token_version: "v1".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let pair = app.state.token_service.generate_token(&ghost).unwrap();

    let response = app
        .request("GET", "/api/users", None, Some(&pair.access_token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wildcard_grant_matches_any_subject() {
    let app = TestApp::new();
    app.engine.add_policy("*", "users", "read").await.unwrap();

    let ghost = authgate_entity::user::User {
        id: Uuid::new_v4(),
        email: "ghost@example.com".to_string(),
        password_hash: String::new(),
        role: authgate_entity::user::UserRole::Member,
        token_version: "v1".to_string(),
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    };
    let pair = app.state.token_service.generate_token(&ghost).unwrap();

    // The wildcard admits the list...
    let list = app
        .request("GET", "/api/users", None, Some(&pair.access_token))
        .await;
    assert_eq!(list.status, StatusCode::OK);

    // ...but not a different object or action.
    let other = app
        .request(
            "DELETE",
            &format!("/api/users/{}", ghost.id),
            None,
            Some(&pair.access_token),
        )
        .await;
    assert_eq!(other.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_a_user_revokes_their_grants() {
    let app = TestApp::new();
    let id = app.create_test_user("u2@example.com", "password123").await;
    let (token, _) = app.login("u2@example.com", "password123").await;

    let response = app
        .request("DELETE", &format!("/api/users/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    // All six creation-time grants are gone, including stream/write.
    let subject = id.to_string();
    assert!(!app.engine.check_permission(&subject, "users", "read"));
    assert!(!app.engine.check_permission(&subject, "stream", "write"));
    assert!(app.engine.is_empty());
}

#[tokio::test]
async fn update_requires_the_write_grant() {
    let app = TestApp::new();
    let id = app.create_test_user("u2@example.com", "password123").await;
    let (token, _) = app.login("u2@example.com", "password123").await;

    let own = app
        .request(
            "PUT",
            &format!("/api/users/{id}"),
            Some(serde_json::json!({ "email": "renamed@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["email"], "renamed@example.com");

    let victim = app.create_test_user("u4@example.com", "password123").await;
    let foreign = app
        .request(
            "PUT",
            &format!("/api/users/{victim}"),
            Some(serde_json::json!({ "email": "hijacked@example.com" })),
            Some(&token),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
}
