use std::fmt;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("invalid Ed25519 private key PEM (expected PKCS#8): {0}")]
    InvalidPem(#[source] jsonwebtoken::errors::Error),
}

impl From<KeyError> for AppError {
    fn from(e: KeyError) -> Self {
        error!(error = %e, "invalid signing key");
        AppError::Internal
    }
}

/// Signing key plus the algorithm it is used with.
#[derive(Clone)]
pub struct SigningKey {
    algorithm: Algorithm,
    key: EncodingKey,
}

impl SigningKey {
    /// HS256 over a shared secret.
    pub fn hmac(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }
        Ok(Self {
            algorithm: Algorithm::HS256,
            key: EncodingKey::from_secret(secret),
        })
    }

    /// EdDSA. `private_key_pem` must be an Ed25519 private key in PKCS#8 PEM format.
    pub fn ed25519_pem(private_key_pem: &str) -> Result<Self, KeyError> {
        let key = EncodingKey::from_ed_pem(private_key_pem.as_bytes()).map_err(|e| {
            warn!(error = %e, "failed to parse access JWT private key PEM");
            KeyError::InvalidPem(e)
        })?;
        Ok(Self {
            algorithm: Algorithm::EdDSA,
            key,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct JwtIssuer {
    issuer: String,
    audience: String,
    ttl_seconds: u64,
    kid: Option<String>,
    signing_key: SigningKey,
}

impl JwtIssuer {
    pub fn new(signing_key: SigningKey, issuer: String, audience: String, ttl_seconds: u64) -> Self {
        Self {
            issuer,
            audience,
            ttl_seconds,
            kid: None,
            signing_key,
        }
    }

    /// Advertise `kid` in every token header.
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, AppError> {
        let mut header = Header::new(self.signing_key.algorithm);
        header.typ = Some("JWT".to_string());
        header.kid = self.kid.clone();
        jsonwebtoken::encode(&header, claims, &self.signing_key.key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            AppError::Internal
        })
    }
}
