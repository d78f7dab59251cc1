//! Bearer-token authentication.
//!
//! Tokens are self-contained: `v1.<user>.<expiry>.<signature>`, where the
//! signature is a SHA-256 digest over the installation secret, the user id
//! and the expiry timestamp. The server verifies tokens without any
//! session store; revocation is rotating the secret. Signature comparison
//! is constant-time and happens before the expiry check, so an attacker
//! learns nothing about a forged token from the error they get back.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::UserId;

/// Why a token was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Configuration for token issue and verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    secret: String,
    ttl: Duration,
}

impl AuthConfig {
    /// A config with the given secret and a 24-hour token lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }

    /// Set how long issued tokens stay valid.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Issues and verifies bearer tokens.
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a token for `user`, valid from `now` for the configured
    /// lifetime.
    pub fn issue(&self, user: UserId, now: DateTime<Utc>) -> String {
        let expiry = now.timestamp() + self.config.ttl.as_secs() as i64;
        let signature = self.sign(user, expiry);
        format!("v1.{user}.{expiry}.{signature}")
    }

    /// Verify a token and return the user it was issued to.
    ///
    /// A token is good up to and including its expiry instant.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, AuthError> {
        let mut parts = token.splitn(4, '.');
        let version = parts.next().ok_or(AuthError::Malformed)?;
        if version != "v1" {
            return Err(AuthError::Malformed);
        }
        let user: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(AuthError::Malformed)?;
        let expiry: i64 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or(AuthError::Malformed)?;
        let signature = parts.next().ok_or(AuthError::Malformed)?;

        let user = UserId::new(user);
        let expected = self.sign(user, expiry);
        if !constant_time_eq::constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            return Err(AuthError::BadSignature);
        }

        if now.timestamp() > expiry {
            return Err(AuthError::Expired);
        }

        Ok(user)
    }

    fn sign(&self, user: UserId, expiry: i64) -> String {
        use base64::Engine;
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.config.secret.as_bytes());
        hasher.update(b".");
        hasher.update(user.to_string().as_bytes());
        hasher.update(b".");
        hasher.update(expiry.to_string().as_bytes());
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}
