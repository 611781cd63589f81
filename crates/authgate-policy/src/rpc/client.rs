//! Resilient client for the remote policy RPC service.
//!
//! One long-lived HTTP client is built at construction and reused for every
//! call — never reconnected per call — and explicitly closed at process
//! shutdown. Each call runs under the caller's deadline and through the
//! injected circuit breaker; no retries happen here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::PolicyBackend;
use crate::breaker::{BreakerError, CircuitBreaker};
use crate::error::PolicyError;

use super::types::{
    AddPolicyIfNotExistsResponse, AddPolicyResponse, CheckPermissionResponse, PolicyOpRequest,
    RemovePolicyResponse, RpcOutcome,
};
use super::{ADD_IF_NOT_EXISTS_PATH, ADD_PATH, CHECK_PATH, REMOVE_PATH};

/// HTTP client for the policy RPC surface.
pub struct PolicyRpcClient {
    http: reqwest::Client,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
    closed: AtomicBool,
}

impl std::fmt::Debug for PolicyRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyRpcClient")
            .field("base_url", &self.base_url)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl PolicyRpcClient {
    /// Connects the client to the policy RPC endpoint.
    pub fn new(endpoint: &str, breaker: Arc<CircuitBreaker>) -> Result<Self, PolicyError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| PolicyError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: endpoint.trim_end_matches('/').to_string(),
            breaker,
            closed: AtomicBool::new(false),
        })
    }

    /// Runs one RPC operation under the deadline and the breaker.
    async fn post<R>(
        &self,
        path: &str,
        request: &PolicyOpRequest,
        deadline: Duration,
    ) -> Result<R, PolicyError>
    where
        R: DeserializeOwned + RpcOutcome,
    {
        if self.closed.load(Ordering::SeqCst) {
            return Err(PolicyError::Closed);
        }

        let url = format!("{}{}", self.base_url, path);
        let attempt = async {
            let response = self
                .http
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| PolicyError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(PolicyError::Remote(format!("rpc returned status {status}")));
            }

            let body: R = response
                .json()
                .await
                .map_err(|e| PolicyError::Transport(e.to_string()))?;

            if !body.error_message().is_empty() {
                return Err(PolicyError::Remote(body.error_message().to_string()));
            }
            Ok(body)
        };

        let guarded = async {
            match tokio::time::timeout(deadline, attempt).await {
                Ok(result) => result,
                Err(_) => Err(PolicyError::DeadlineExceeded),
            }
        };

        match self.breaker.call(guarded).await {
            Ok(body) => Ok(body),
            Err(BreakerError::Open) => Err(PolicyError::CircuitOpen),
            Err(BreakerError::Inner(e)) => Err(e),
        }
    }
}

#[async_trait]
impl PolicyBackend for PolicyRpcClient {
    async fn check_permission(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError> {
        let request = PolicyOpRequest {
            subject: subject.to_string(),
            object: object.to_string(),
            action: action.to_string(),
        };
        let response: CheckPermissionResponse = self.post(CHECK_PATH, &request, deadline).await?;
        Ok(response.allowed)
    }

    async fn add_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError> {
        let request = PolicyOpRequest {
            subject: subject.to_string(),
            object: object.to_string(),
            action: action.to_string(),
        };
        let response: AddPolicyResponse = self.post(ADD_PATH, &request, deadline).await?;
        Ok(response.added)
    }

    async fn remove_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError> {
        let request = PolicyOpRequest {
            subject: subject.to_string(),
            object: object.to_string(),
            action: action.to_string(),
        };
        let response: RemovePolicyResponse = self.post(REMOVE_PATH, &request, deadline).await?;
        Ok(response.removed)
    }

    async fn add_policy_if_not_exists(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError> {
        let request = PolicyOpRequest {
            subject: subject.to_string(),
            object: object.to_string(),
            action: action.to_string(),
        };
        let response: AddPolicyIfNotExistsResponse =
            self.post(ADD_IF_NOT_EXISTS_PATH, &request, deadline).await?;
        Ok(response.exists)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!(base_url = %self.base_url, "policy rpc client closed");
    }
}
