//! Wire types for the policy RPC surface.
//!
//! Every response carries an `error` description string, distinct from the
//! transport-level error: a populated field means the operation reached the
//! engine but failed there (e.g. its backing store).

use serde::{Deserialize, Serialize};

/// Request body shared by all four policy operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyOpRequest {
    /// Subject of the tuple; `*` for wildcard grants.
    pub subject: String,
    /// Object of the tuple.
    pub object: String,
    /// Action of the tuple.
    pub action: String,
}

/// Response of the permission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPermissionResponse {
    /// Whether the tuple (or a wildcard match) grants the request.
    pub allowed: bool,
    /// Engine-side error description; empty on success.
    #[serde(default)]
    pub error: String,
}

/// Response of the add-policy operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPolicyResponse {
    /// Whether the tuple was newly added.
    pub added: bool,
    /// Engine-side error description; empty on success.
    #[serde(default)]
    pub error: String,
}

/// Response of the remove-policy operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovePolicyResponse {
    /// Whether a tuple was removed.
    pub removed: bool,
    /// Engine-side error description; empty on success.
    #[serde(default)]
    pub error: String,
}

/// Response of the idempotent ensure-policy operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPolicyIfNotExistsResponse {
    /// Whether the tuple is present after the call (existed or was added).
    pub exists: bool,
    /// Engine-side error description; empty on success.
    #[serde(default)]
    pub error: String,
}

/// Common accessor for the engine-side error field.
pub trait RpcOutcome {
    /// The engine-side error description, empty when the operation succeeded.
    fn error_message(&self) -> &str;
}

impl RpcOutcome for CheckPermissionResponse {
    fn error_message(&self) -> &str {
        &self.error
    }
}

impl RpcOutcome for AddPolicyResponse {
    fn error_message(&self) -> &str {
        &self.error
    }
}

impl RpcOutcome for RemovePolicyResponse {
    fn error_message(&self) -> &str {
        &self.error
    }
}

impl RpcOutcome for AddPolicyIfNotExistsResponse {
    fn error_message(&self) -> &str {
        &self.error
    }
}
