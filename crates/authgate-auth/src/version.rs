//! Token version tags.
//!
//! A user's `token_version` is the sole revocation primitive: bumping it to
//! a fresh value invalidates every refresh token issued under the previous
//! one. Tags are opaque and compared only for equality.

use uuid::Uuid;

/// Generates a fresh, previously-unused token version tag.
pub fn new_token_version() -> String {
    format!("v{}", Uuid::new_v4().simple())
}
