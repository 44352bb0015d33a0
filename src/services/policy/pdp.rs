/*
 * Responsibility
 * - Policy decision: credential + request context + requirement -> Decision
 * - Fixed, fail-fast order: authentication, scope, role, device, risk
 * - Stateless: one instance per process, shared behind Arc
 */
use chrono::{DateTime, Utc};

use super::decision::{Decision, DenyReason};
use super::requirement::PolicyRequirement;
use super::types::RequestContext;
use crate::services::auth::CredentialVerifier;

#[derive(Clone, Debug)]
pub struct PolicyDecisionPoint {
    verifier: CredentialVerifier,
}

impl PolicyDecisionPoint {
    pub fn new(verifier: CredentialVerifier) -> Self {
        Self { verifier }
    }

    pub fn evaluate(
        &self,
        presented_token: Option<&str>,
        context: &RequestContext,
        requirement: &PolicyRequirement,
    ) -> Decision {
        self.evaluate_at(presented_token, context, requirement, Utc::now())
    }

    /// Same as [`evaluate`](Self::evaluate) with an explicit clock.
    pub fn evaluate_at(
        &self,
        presented_token: Option<&str>,
        context: &RequestContext,
        requirement: &PolicyRequirement,
        now: DateTime<Utc>,
    ) -> Decision {
        let Some(token) = presented_token.map(str::trim).filter(|t| !t.is_empty()) else {
            return Decision::Deny(DenyReason::MissingCredential);
        };

        let credential = match self.verifier.verify_at(token, now) {
            Ok(credential) => credential,
            Err(err) => {
                tracing::debug!(error = %err, "credential rejected");
                return Decision::Deny(DenyReason::InvalidCredential);
            }
        };

        if let Some(scope) = requirement.scope() {
            if !credential.has_scope(scope) {
                return Decision::Deny(DenyReason::InsufficientScope);
            }
        }

        if let Some(role) = requirement.role() {
            if credential.role != role {
                return Decision::Deny(DenyReason::InsufficientRole);
            }
        }

        if let Some(device_trust) = requirement.device_trust() {
            if context.device_trust != Some(device_trust) {
                return Decision::Deny(DenyReason::NonCompliantDevice);
            }
        }

        let risk_rejected = match context.risk_level {
            Some(level) => requirement.disallows(level),
            None => requirement.requires_risk_signal(),
        };
        if risk_rejected {
            return Decision::Deny(DenyReason::ExcessiveRisk);
        }

        Decision::Allow(credential)
    }
}
