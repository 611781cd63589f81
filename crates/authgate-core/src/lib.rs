//! # authgate-core
//!
//! Shared foundation for the AuthGate platform: the unified error type,
//! configuration schemas, pagination types, and the credential-store trait
//! implemented by the database layer.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use traits::UserStore;
