use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::services::auth::key_resolver::KeyResolver;
use crate::services::policy::{ConfigurationError, Role, Scope};

// Errors returned by access-token verification + strict claim validation.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("no verification key for kid {kid:?}")]
    UnresolvedKey { kid: Option<String> },

    #[error("token alg {presented:?} does not match key alg {expected:?}")]
    AlgorithmMismatch {
        expected: Algorithm,
        presented: Algorithm,
    },

    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,
}

/// Access token (JWT) claims as issued by the auth service.
///
/// `aud` may be a string or an array; `jsonwebtoken` checks it against the expected audience.
/// A missing or mistyped `role` / `scp` fails deserialization, hence verification.
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    sub: String,
    exp: i64,

    #[serde(default)]
    nbf: Option<i64>,
    #[serde(default)]
    jti: Option<String>,

    role: Role,
    #[serde(default)]
    scp: Vec<Scope>,
    #[serde(default)]
    tenant: Option<String>,
}

/// Verified credential. Every field has passed signature and claim validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub subject: String,
    pub role: Role,
    pub scopes: BTreeSet<Scope>,
    pub issuer: String,
    pub audience: String,
    pub expires_at: DateTime<Utc>,
    pub tenant: Option<String>,
    pub jti: Option<String>,
}

impl VerifiedCredential {
    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }
}

#[derive(Clone)]
pub struct CredentialVerifier {
    issuer: String,
    audience: String,
    keys: Arc<dyn KeyResolver>,
    nbf_leeway_seconds: i64,
}

impl fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("nbf_leeway_seconds", &self.nbf_leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        keys: Arc<dyn KeyResolver>,
        nbf_leeway_seconds: u32,
    ) -> Result<Self, ConfigurationError> {
        let issuer = issuer.into();
        let audience = audience.into();

        if issuer.trim().is_empty() {
            return Err(ConfigurationError::MissingExpectedClaim("issuer"));
        }
        if audience.trim().is_empty() {
            return Err(ConfigurationError::MissingExpectedClaim("audience"));
        }
        if keys.resolve(&issuer, None).is_none() {
            return Err(ConfigurationError::UnresolvableKey { issuer });
        }

        Ok(Self {
            issuer,
            audience,
            keys,
            nbf_leeway_seconds: i64::from(nbf_leeway_seconds),
        })
    }

    /// Verify signature, `iss`, `aud`, `exp` (against `now`) and the typed claims.
    ///
    /// `jsonwebtoken::Validation` checks signature, `iss`, `aud` and claim presence.
    /// Expiry is checked here against the supplied clock without leeway.
    pub fn verify_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerifiedCredential, CredentialError> {
        let header = jsonwebtoken::decode_header(token)?;

        let key = self
            .keys
            .resolve(&self.issuer, header.kid.as_deref())
            .ok_or_else(|| CredentialError::UnresolvedKey {
                kid: header.kid.clone(),
            })?;

        if header.alg != key.algorithm() {
            return Err(CredentialError::AlgorithmMismatch {
                expected: key.algorithm(),
                presented: header.alg,
            });
        }

        let mut validation = Validation::new(key.algorithm());
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, key.decoding_key(), &validation)?
                .claims;

        if claims.iss.trim().is_empty() {
            return Err(CredentialError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(CredentialError::EmptyClaim("sub"));
        }
        if claims.exp <= 0 {
            return Err(CredentialError::EmptyClaim("exp"));
        }

        let now_ts = now.timestamp();
        if now_ts >= claims.exp {
            return Err(CredentialError::Expired);
        }
        if let Some(nbf) = claims.nbf {
            if now_ts + self.nbf_leeway_seconds < nbf {
                return Err(CredentialError::NotYetValid);
            }
        }

        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or(CredentialError::EmptyClaim("exp"))?;

        Ok(VerifiedCredential {
            subject: claims.sub,
            role: claims.role,
            scopes: claims.scp.into_iter().collect(),
            issuer: claims.iss,
            audience: self.audience.clone(),
            expires_at,
            tenant: claims.tenant,
            jti: claims.jti,
        })
    }
}
