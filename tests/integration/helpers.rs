//! Test harness: an in-process app with an in-memory credential store, a
//! real policy engine, and fixture signing keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use authgate_api::router::build_router;
use authgate_api::state::AppState;
use authgate_auth::password::PasswordHasher;
use authgate_auth::token::TokenService;
use authgate_core::config::auth::AuthConfig;
use authgate_core::config::database::DatabaseConfig;
use authgate_core::config::AppConfig;
use authgate_core::error::AppError;
use authgate_core::result::AppResult;
use authgate_core::traits::user_store::UserStore;
use authgate_core::types::pagination::{PageRequest, PageResponse};
use authgate_entity::user::{NewUser, User};
use authgate_policy::backend::{LocalPolicyBackend, PolicyBackend};
use authgate_policy::engine::PolicyEngine;
use authgate_service::auth::AuthService;
use authgate_service::user::UserService;

pub const ACCESS_PRIVATE: &str = include_str!("../fixtures/access_private.pem");
pub const ACCESS_PUBLIC: &str = include_str!("../fixtures/access_public.pem");
pub const REFRESH_PRIVATE: &str = include_str!("../fixtures/refresh_private.pem");
pub const REFRESH_PUBLIC: &str = include_str!("../fixtures/refresh_public.pem");

/// Hash-map credential store standing in for Postgres.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == new.email) {
            return Err(AppError::conflict("duplicate email"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            token_version: "v1".to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<User>> {
        let users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
        let total = users.len() as u64;
        Ok(PageResponse::new(users, page.page, page.page_size, total))
    }

    async fn update_email(&self, id: Uuid, email: &str) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        Ok(users.get_mut(&id).map(|u| {
            u.email = email.to_string();
            u.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.users.lock().unwrap().remove(&id).is_some())
    }

    async fn update_token_version(&self, id: Uuid, version: &str) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id) {
            Some(u) => {
                u.token_version = version.to_string();
                Ok(())
            }
            None => Err(AppError::not_found("User not found")),
        }
    }
}

/// A response with its JSON body already collected.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
    pub text: String,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// The `refresh_token` cookie value set by this response, if any.
    pub fn refresh_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("refresh_token="))
            .map(|v| {
                v.split(';')
                    .next()
                    .unwrap_or_default()
                    .trim_start_matches("refresh_token=")
                    .to_string()
            })
    }
}

/// The application under test.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub engine: Arc<PolicyEngine>,
}

impl TestApp {
    /// App with a local in-process policy engine.
    pub fn new() -> Self {
        let engine = Arc::new(PolicyEngine::new());
        let backend: Arc<dyn PolicyBackend> =
            Arc::new(LocalPolicyBackend::new(Arc::clone(&engine)));
        Self::with_policy(backend, engine)
    }

    /// App with an arbitrary policy backend (e.g. a failing stub).
    pub fn with_policy(policy: Arc<dyn PolicyBackend>, engine: Arc<PolicyEngine>) -> Self {
        let config = Arc::new(test_config());
        let token_service = Arc::new(TokenService::new(&config.auth).unwrap());
        let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::default());
        let user_service = Arc::new(UserService::new(
            store,
            Arc::new(PasswordHasher::new()),
            Arc::clone(&policy),
            Duration::from_secs(1),
        ));
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&token_service),
            Arc::clone(&user_service),
        ));

        let state = AppState {
            config,
            token_service,
            user_service,
            auth_service,
            policy,
        };

        Self {
            router: build_router(state.clone()),
            state,
            engine,
        }
    }

    /// Sends a request with an optional JSON body and bearer token.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Sends a request carrying a refresh cookie.
    pub async fn request_with_cookie(
        &self,
        method: &str,
        path: &str,
        cookie_value: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::COOKIE, format!("refresh_token={cookie_value}"))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        TestResponse {
            status,
            body,
            text,
            headers,
        }
    }

    /// Registers a user and returns their id.
    pub async fn create_test_user(&self, email: &str, password: &str) -> Uuid {
        let response = self
            .request(
                "POST",
                "/api/users",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Logs in and returns (access token, refresh cookie value).
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        let access = response.body["access_token"].as_str().unwrap().to_string();
        let cookie = response.refresh_cookie().expect("refresh cookie set");
        (access, cookie)
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        server: Default::default(),
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
        },
        auth: AuthConfig {
            issuer: "authgate-test".to_string(),
            access_ttl_minutes: 15,
            refresh_ttl_hours: 24,
            access_private_key_pem: ACCESS_PRIVATE.to_string(),
            access_public_key_pem: ACCESS_PUBLIC.to_string(),
            refresh_private_key_pem: REFRESH_PRIVATE.to_string(),
            refresh_public_key_pem: REFRESH_PUBLIC.to_string(),
            cookie_domain: String::new(),
        },
        policy: Default::default(),
        logging: Default::default(),
    }
}
