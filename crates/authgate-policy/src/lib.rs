//! # authgate-policy
//!
//! The authorization decision core of AuthGate.
//!
//! ## Modules
//!
//! - `engine` — the in-process (subject, object, action) decision relation
//! - `store` — durable backing store contract for policy tuples
//! - `breaker` — circuit breaker guarding calls to failing dependencies
//! - `backend` — the client-side contract the authorization gate consumes,
//!   with a local in-process implementation
//! - `rpc` — the policy RPC surface: wire types, axum server, reqwest client

pub mod backend;
pub mod breaker;
pub mod engine;
pub mod error;
pub mod rpc;
pub mod store;

pub use backend::{LocalPolicyBackend, PolicyBackend};
pub use breaker::{BreakerError, BreakerSettings, CircuitBreaker};
pub use engine::PolicyEngine;
pub use error::PolicyError;
pub use rpc::client::PolicyRpcClient;
pub use store::PolicyStore;
