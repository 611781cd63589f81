//! # authgate-auth
//!
//! Bearer-token issuance and validation for the AuthGate platform.
//!
//! ## Modules
//!
//! - `token` — RS256 access/refresh token minting, verification, and key export
//! - `password` — Argon2id password hashing
//! - `version` — token-version tag generation (the revocation primitive)

pub mod password;
pub mod token;
pub mod version;

pub use password::PasswordHasher;
pub use token::{AccessClaims, RefreshClaims, TokenPair, TokenService};
pub use version::new_token_version;
