//! RS256 token minting and verification.
//!
//! Access and refresh tokens are signed with independent RSA key pairs.
//! Keys are parsed once at construction and immutable for the process
//! lifetime; a missing or unparseable key is a fatal startup error, never a
//! per-request one.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::Duration;
use tracing::debug;

use authgate_core::config::auth::AuthConfig;
use authgate_core::error::AppError;
use authgate_entity::user::User;

use super::claims::{AccessClaims, RefreshClaims};

/// Value of the `token_type` field in every issued pair.
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// An atomically issued access + refresh token pair.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Always `bearer`.
    pub token_type: String,
}

/// Mints and verifies bearer tokens. The only component that signs tokens.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_validation: Validation,
    refresh_validation: Validation,
    /// PEM of the access public key, exported for external verifiers.
    access_public_pem: String,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
    issuer: String,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenService {
    /// Creates the token service from configuration, parsing all four PEM
    /// keys. Fails if any key is absent or unparseable.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let access_encoding = EncodingKey::from_rsa_pem(config.access_private_key_pem.as_bytes())
            .map_err(|e| {
                AppError::configuration(format!("Failed to parse access private key: {e}"))
            })?;
        let access_decoding = DecodingKey::from_rsa_pem(config.access_public_key_pem.as_bytes())
            .map_err(|e| {
                AppError::configuration(format!("Failed to parse access public key: {e}"))
            })?;
        let refresh_encoding = EncodingKey::from_rsa_pem(config.refresh_private_key_pem.as_bytes())
            .map_err(|e| {
                AppError::configuration(format!("Failed to parse refresh private key: {e}"))
            })?;
        let refresh_decoding = DecodingKey::from_rsa_pem(config.refresh_public_key_pem.as_bytes())
            .map_err(|e| {
                AppError::configuration(format!("Failed to parse refresh public key: {e}"))
            })?;

        Ok(Self {
            access_encoding,
            access_decoding,
            refresh_encoding,
            refresh_decoding,
            access_validation: build_validation(&config.issuer),
            refresh_validation: build_validation(&config.issuer),
            access_public_pem: config.access_public_key_pem.clone(),
            access_ttl: chrono::Duration::minutes(config.access_ttl_minutes as i64),
            refresh_ttl: chrono::Duration::hours(config.refresh_ttl_hours as i64),
            issuer: config.issuer.clone(),
        })
    }

    /// Mints an access + refresh token pair for the given user.
    ///
    /// The refresh claims copy the user's `token_version` at call time.
    /// Either both tokens sign successfully or neither is returned.
    pub fn generate_token(&self, user: &User) -> Result<TokenPair, AppError> {
        let now = Utc::now();

        let access_claims = AccessClaims {
            sub: user.id.to_string(),
            role: user.role,
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        let refresh_claims = RefreshClaims {
            sub: user.id.to_string(),
            token_version: user.token_version.clone(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        let header = Header::new(Algorithm::RS256);
        let access_token = encode(&header, &access_claims, &self.access_encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign access token: {e}")))?;
        let refresh_token = encode(&header, &refresh_claims, &self.refresh_encoding)
            .map_err(|e| AppError::internal(format!("Failed to sign refresh token: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl.num_seconds(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        })
    }

    /// Verifies an access token: RS256 signature, expiry, and issuer.
    ///
    /// Tokens signed with any other algorithm family (including HMAC with
    /// the public key as secret, the classic confusion attack) are rejected
    /// by the pinned algorithm list. All failures collapse into a single
    /// authentication error so callers cannot probe the reason.
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.access_validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "access token rejected");
                AppError::authentication("invalid token")
            })
    }

    /// Verifies a refresh token with the refresh key pair.
    ///
    /// Returns the claims without consulting the credential store; comparing
    /// `token_version` against the stored user is the caller's job.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, AppError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.refresh_validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "refresh token rejected");
                AppError::authentication("invalid token")
            })
    }

    /// Access token lifetime, for transport-level expiry metadata.
    pub fn access_expiry(&self) -> Duration {
        Duration::from_secs(self.access_ttl.num_seconds() as u64)
    }

    /// Refresh token lifetime, for cookie expiry metadata.
    pub fn refresh_expiry(&self) -> Duration {
        Duration::from_secs(self.refresh_ttl.num_seconds() as u64)
    }

    /// PEM-encoded access public key for external stateless verification.
    pub fn public_key_pem(&self) -> &str {
        &self.access_public_pem
    }
}

/// Pins RS256, zero leeway, and the expected issuer.
fn build_validation(issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.set_issuer(&[issuer]);
    validation
}
