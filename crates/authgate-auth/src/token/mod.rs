//! Access and refresh token minting and verification.

pub mod claims;
pub mod service;

pub use claims::{AccessClaims, RefreshClaims};
pub use service::{TokenPair, TokenService};
