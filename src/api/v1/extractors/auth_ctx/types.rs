/*
 * Responsibility
 * - The authenticated, authorized context seen by handlers
 * - The guard middleware builds it from the verified credential and stores it in request extensions
 *
 * Notes
 * - Token verification and policy checks belong to middleware/services
 * - Only non-secret claims are carried here
 */
use crate::services::auth::VerifiedCredential;
use crate::services::policy::{Role, Scope};

#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub role: Role,
    pub scopes: Vec<Scope>,
    pub tenant: Option<String>,
    pub jti: Option<String>,
}

impl From<VerifiedCredential> for AuthCtx {
    fn from(credential: VerifiedCredential) -> Self {
        Self {
            subject: credential.subject,
            role: credential.role,
            scopes: credential.scopes.into_iter().collect(),
            tenant: credential.tenant,
            jti: credential.jti,
        }
    }
}
