pub mod access_jwt;
pub mod factory;
pub mod key_resolver;

pub use access_jwt::{CredentialError, CredentialVerifier, VerifiedCredential};
pub use factory::build_decision_point;
pub use key_resolver::{KeyResolver, StaticKeyResolver, VerificationKey};
