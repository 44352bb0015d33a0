use thiserror::Error;

/// Deployment misconfiguration. Surfaces at startup, never as a per-request deny.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("policy requirement declares no checks")]
    EmptyRequirement,

    #[error("policy requirement has an empty scope")]
    EmptyScope,

    #[error("policy requirement disallows every risk level")]
    UnsatisfiableRiskPolicy,

    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    #[error("unknown device trust state: {0:?}")]
    UnknownDeviceTrust(String),

    #[error("unknown risk level: {0:?}")]
    UnknownRiskLevel(String),

    #[error("unknown protected operation: {0:?}")]
    UnknownOperation(String),

    #[error("invalid policy file: {0}")]
    InvalidPolicyFile(#[from] serde_json::Error),

    #[error("expected {0} must not be empty")]
    MissingExpectedClaim(&'static str),

    #[error("no verification key resolvable for issuer {issuer:?}")]
    UnresolvableKey { issuer: String },

    #[error("invalid verification key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}
