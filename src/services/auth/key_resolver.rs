//! Verification key material and its lookup by issuer / `kid`.
//!
//! Resolution is synchronous and in-memory. A resolver backed by a remote JWKS
//! would fetch and cache out of band, then answer from the cache here.

use std::collections::HashMap;
use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey};

use crate::services::policy::ConfigurationError;

#[derive(Clone)]
pub struct VerificationKey {
    algorithm: Algorithm,
    key: DecodingKey,
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("VerificationKey")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

impl VerificationKey {
    /// Shared-secret key (HS256).
    pub fn hmac(secret: &[u8]) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            key: DecodingKey::from_secret(secret),
        }
    }

    /// Ed25519 public key in SPKI PEM format (EdDSA).
    pub fn ed25519_pem(public_key_pem: &str) -> Result<Self, ConfigurationError> {
        let key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())?;
        Ok(Self {
            algorithm: Algorithm::EdDSA,
            key,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

/// Supplies verification keys for an issuer.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, issuer: &str, kid: Option<&str>) -> Option<VerificationKey>;
}

/// Fixed key set for a single issuer.
///
/// Tokens without `kid` use the default key. Tokens naming a `kid` must match
/// a registered key.
#[derive(Clone, Debug)]
pub struct StaticKeyResolver {
    issuer: String,
    default_key: VerificationKey,
    keys_by_kid: HashMap<String, VerificationKey>,
}

impl StaticKeyResolver {
    pub fn new(issuer: impl Into<String>, default_key: VerificationKey) -> Self {
        Self {
            issuer: issuer.into(),
            default_key,
            keys_by_kid: HashMap::new(),
        }
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: VerificationKey) -> Self {
        self.keys_by_kid.insert(kid.into(), key);
        self
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve(&self, issuer: &str, kid: Option<&str>) -> Option<VerificationKey> {
        if issuer != self.issuer {
            return None;
        }
        match kid {
            Some(kid) => self.keys_by_kid.get(kid).cloned(),
            None => Some(self.default_key.clone()),
        }
    }
}
