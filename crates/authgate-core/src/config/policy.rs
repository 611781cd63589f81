//! Policy engine, policy RPC, and circuit breaker configuration.

use serde::{Deserialize, Serialize};

/// Where the serving process finds its policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Engine runs in-process; decisions never cross the network.
    Local,
    /// Engine is reached over the policy RPC endpoint.
    Remote,
}

/// Policy engine and client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Whether the engine runs in-process or behind the RPC boundary.
    #[serde(default = "default_mode")]
    pub mode: PolicyMode,
    /// Base URL of the remote policy RPC service (remote mode).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Whether this process also serves the policy RPC surface.
    #[serde(default)]
    pub serve_rpc: bool,
    /// Listen address for the policy RPC server.
    #[serde(default = "default_rpc_listen")]
    pub rpc_listen: String,
    /// Deadline for permission checks, in milliseconds.
    #[serde(default = "default_check_deadline")]
    pub check_deadline_ms: u64,
    /// Deadline for policy writes (grants/revokes), in milliseconds.
    #[serde(default = "default_write_deadline")]
    pub write_deadline_ms: u64,
    /// Circuit breaker tuning.
    #[serde(default)]
    pub breaker: BreakerConfig,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            endpoint: default_endpoint(),
            serve_rpc: false,
            rpc_listen: default_rpc_listen(),
            check_deadline_ms: default_check_deadline(),
            write_deadline_ms: default_write_deadline(),
            breaker: BreakerConfig::default(),
        }
    }
}

/// Circuit breaker tuning shared by the policy client and the
/// breaker-guarded repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerConfig {
    /// Consecutive failures beyond which the breaker opens.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// How long the breaker stays open before admitting trial calls, in seconds.
    #[serde(default = "default_open_cooldown")]
    pub open_cooldown_seconds: u64,
    /// Number of trial calls admitted while half-open.
    #[serde(default = "default_half_open_max")]
    pub half_open_max_requests: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            open_cooldown_seconds: default_open_cooldown(),
            half_open_max_requests: default_half_open_max(),
        }
    }
}

fn default_mode() -> PolicyMode {
    PolicyMode::Local
}

fn default_endpoint() -> String {
    "http://127.0.0.1:7071".to_string()
}

fn default_rpc_listen() -> String {
    "0.0.0.0:7071".to_string()
}

fn default_check_deadline() -> u64 {
    500
}

fn default_write_deadline() -> u64 {
    2_000
}

fn default_failure_threshold() -> u32 {
    3
}

fn default_open_cooldown() -> u64 {
    60
}

fn default_half_open_max() -> u32 {
    3
}
