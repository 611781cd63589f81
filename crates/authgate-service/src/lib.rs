//! # authgate-service
//!
//! Domain services sitting between the HTTP layer and the stores:
//!
//! - `context` — the typed request identity threaded through the call chain
//! - `user` — user lifecycle with self-ownership policy grants
//! - `auth` — login, refresh, and revoke-all flows

pub mod auth;
pub mod context;
pub mod user;

pub use auth::AuthService;
pub use context::Identity;
pub use user::UserService;
