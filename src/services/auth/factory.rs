/// Factory: build the `PolicyDecisionPoint` from application `Config`.
use std::sync::Arc;

use crate::config::{AccessKeyConfig, Config};
use crate::services::auth::{CredentialVerifier, StaticKeyResolver, VerificationKey};
use crate::services::policy::{ConfigurationError, PolicyDecisionPoint};

pub fn build_decision_point(config: &Config) -> Result<Arc<PolicyDecisionPoint>, ConfigurationError> {
    let key = match &config.access_key {
        AccessKeyConfig::Ed25519PublicPem(pem) => VerificationKey::ed25519_pem(pem)?,
        AccessKeyConfig::SharedSecret(secret) => VerificationKey::hmac(secret.as_bytes()),
    };

    let resolver = match &config.access_jwt_kid {
        Some(kid) => StaticKeyResolver::new(&config.auth_issuer, key.clone()).with_key(kid, key),
        None => StaticKeyResolver::new(&config.auth_issuer, key),
    };

    let verifier = CredentialVerifier::new(
        &config.auth_issuer,
        &config.auth_audience,
        Arc::new(resolver),
        config.access_token_nbf_leeway_seconds,
    )?;

    Ok(Arc::new(PolicyDecisionPoint::new(verifier)))
}
