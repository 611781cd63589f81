//! Request middleware.

pub mod authorize;
pub mod logging;

pub use authorize::{PermissionGate, authorize};
