//! AuthGate Server — authentication and authorization backbone.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use authgate_api::state::AppState;
use authgate_auth::password::PasswordHasher;
use authgate_auth::token::TokenService;
use authgate_core::config::AppConfig;
use authgate_core::config::policy::PolicyMode;
use authgate_core::error::AppError;
use authgate_core::traits::user_store::UserStore;
use authgate_database::repositories::policy::PolicyRepository;
use authgate_database::repositories::user::UserRepository;
use authgate_policy::backend::{LocalPolicyBackend, PolicyBackend};
use authgate_policy::breaker::{BreakerSettings, CircuitBreaker};
use authgate_policy::engine::PolicyEngine;
use authgate_policy::rpc::client::PolicyRpcClient;
use authgate_policy::rpc::server::build_rpc_router;
use authgate_service::auth::AuthService;
use authgate_service::user::UserService;

#[tokio::main]
async fn main() {
    let env = std::env::var("AUTHGATE_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AuthGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Token service ────────────────────────────────────
    // Key material is parsed before anything binds a socket: a missing or
    // unparseable signing key prevents the process from taking any traffic.
    let token_service = Arc::new(TokenService::new(&config.auth)?);
    tracing::info!("Signing keys loaded");

    // ── Step 2: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = authgate_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    authgate_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // ── Step 3: Repositories with injected breakers ──────────────
    let breaker_settings = BreakerSettings::from(&config.policy.breaker);
    let user_store: Arc<dyn UserStore> = Arc::new(UserRepository::new(
        db_pool.clone(),
        Arc::new(CircuitBreaker::new("user-db", breaker_settings.clone())),
    ));

    // ── Step 4: Policy engine / backend ──────────────────────────
    let needs_engine = config.policy.mode == PolicyMode::Local || config.policy.serve_rpc;
    let engine = if needs_engine {
        let store = Arc::new(PolicyRepository::new(
            db_pool.clone(),
            Arc::new(CircuitBreaker::new("policy-db", breaker_settings.clone())),
        ));
        let engine = Arc::new(PolicyEngine::with_store(store));
        let count = engine.load().await?;
        tracing::info!(count, "Policy relation loaded");
        Some(engine)
    } else {
        None
    };

    let policy: Arc<dyn PolicyBackend> = match config.policy.mode {
        PolicyMode::Local => {
            let engine = engine
                .clone()
                .ok_or_else(|| AppError::configuration("local policy mode requires an engine"))?;
            tracing::info!("Policy decisions run in-process");
            Arc::new(LocalPolicyBackend::new(engine))
        }
        PolicyMode::Remote => {
            let breaker = Arc::new(CircuitBreaker::new("policy-rpc", breaker_settings.clone()));
            let client = PolicyRpcClient::new(&config.policy.endpoint, breaker)
                .map_err(|e| AppError::configuration(format!("Policy client init failed: {e}")))?;
            tracing::info!(endpoint = %config.policy.endpoint, "Policy decisions via RPC");
            Arc::new(client)
        }
    };

    // ── Step 5: Services ─────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_store),
        password_hasher,
        Arc::clone(&policy),
        Duration::from_millis(config.policy.write_deadline_ms),
    ));
    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&token_service),
        Arc::clone(&user_service),
    ));
    tracing::info!("Services initialized");

    // ── Step 6: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Step 7: Policy RPC server ────────────────────────────────
    if config.policy.serve_rpc {
        if let Some(engine) = &engine {
            let rpc_router = build_rpc_router(Arc::clone(engine));
            let listener = tokio::net::TcpListener::bind(&config.policy.rpc_listen)
                .await
                .map_err(|e| {
                    AppError::internal(format!(
                        "Failed to bind {}: {}",
                        config.policy.rpc_listen, e
                    ))
                })?;
            tracing::info!(addr = %config.policy.rpc_listen, "Policy RPC server listening");

            let mut rpc_shutdown = shutdown_rx.clone();
            tokio::spawn(async move {
                let serve = axum::serve(listener, rpc_router).with_graceful_shutdown(async move {
                    let _ = rpc_shutdown.changed().await;
                });
                if let Err(e) = serve.await {
                    tracing::error!("Policy RPC server error: {}", e);
                }
            });
        }
    }

    // ── Step 8: Build and start HTTP server ──────────────────────
    let app_state = AppState {
        config: Arc::new(config.clone()),
        token_service,
        user_service,
        auth_service,
        policy: Arc::clone(&policy),
    };

    let app = authgate_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("AuthGate server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 9: Release the policy channel ───────────────────────
    policy.close().await;

    tracing::info!("AuthGate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
