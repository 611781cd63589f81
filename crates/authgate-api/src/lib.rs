//! # authgate-api
//!
//! The HTTP surface of AuthGate: auth and user routes, the per-request
//! authorization gate, and the error-to-response mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
