//! Token issuance configuration and signing key material.
//!
//! Access and refresh tokens are signed with independent RSA key pairs so
//! that leakage of one key does not compromise the other class of token.
//! The PEM fields are typically injected through `AUTHGATE__AUTH__*`
//! environment variables rather than checked into a config file.

use serde::{Deserialize, Serialize};

/// Token issuance and key material settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Issuer string embedded in every claim set.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in hours.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_hours: u64,
    /// PEM-encoded RSA private key used to sign access tokens.
    #[serde(default)]
    pub access_private_key_pem: String,
    /// PEM-encoded RSA public key used to verify access tokens.
    #[serde(default)]
    pub access_public_key_pem: String,
    /// PEM-encoded RSA private key used to sign refresh tokens.
    #[serde(default)]
    pub refresh_private_key_pem: String,
    /// PEM-encoded RSA public key used to verify refresh tokens.
    #[serde(default)]
    pub refresh_public_key_pem: String,
    /// Domain attribute for the refresh token cookie.
    #[serde(default)]
    pub cookie_domain: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: default_issuer(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_hours: default_refresh_ttl(),
            access_private_key_pem: String::new(),
            access_public_key_pem: String::new(),
            refresh_private_key_pem: String::new(),
            refresh_public_key_pem: String::new(),
            cookie_domain: String::new(),
        }
    }
}

fn default_issuer() -> String {
    "authgate".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    168
}
