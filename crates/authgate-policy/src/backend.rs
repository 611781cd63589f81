//! Client-side policy contract consumed by the serving process.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::engine::PolicyEngine;
use crate::error::PolicyError;

/// The policy operations as seen from the serving process.
///
/// Every call takes an explicit deadline. Implementations must return
/// promptly once it elapses and must never retry on their own — retries,
/// if any, belong to the caller.
#[async_trait]
pub trait PolicyBackend: Send + Sync {
    /// Evaluate (subject, object, action). `Ok(false)` is an explicit deny;
    /// errors mean the policy machinery was unreachable.
    async fn check_permission(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError>;

    /// Insert a tuple; returns whether it was newly added.
    async fn add_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError>;

    /// Remove a tuple; removing an absent tuple is a no-op success.
    async fn remove_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError>;

    /// Ensure a tuple exists; idempotent under concurrency.
    async fn add_policy_if_not_exists(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        deadline: Duration,
    ) -> Result<bool, PolicyError>;

    /// Release the backend at process shutdown. Calls after close fail.
    async fn close(&self);
}

/// In-process backend wrapping the engine directly; decisions never cross
/// the network, so deadlines are trivially met.
pub struct LocalPolicyBackend {
    engine: Arc<PolicyEngine>,
}

impl LocalPolicyBackend {
    /// Wraps an engine handle.
    pub fn new(engine: Arc<PolicyEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl PolicyBackend for LocalPolicyBackend {
    async fn check_permission(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        Ok(self.engine.check_permission(subject, object, action))
    }

    async fn add_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        self.engine
            .add_policy(subject, object, action)
            .await
            .map_err(|e| PolicyError::Internal(e.to_string()))
    }

    async fn remove_policy(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        self.engine
            .remove_policy(subject, object, action)
            .await
            .map_err(|e| PolicyError::Internal(e.to_string()))
    }

    async fn add_policy_if_not_exists(
        &self,
        subject: &str,
        object: &str,
        action: &str,
        _deadline: Duration,
    ) -> Result<bool, PolicyError> {
        self.engine
            .add_policy_if_not_exists(subject, object, action)
            .await
            .map_err(|e| PolicyError::Internal(e.to_string()))
    }

    async fn close(&self) {}
}
