use std::fmt;

use serde::Serialize;

use crate::services::auth::VerifiedCredential;

/// Why a request was denied. Carries no caller payload, so it is safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    MissingCredential,
    InvalidCredential,
    InsufficientScope,
    InsufficientRole,
    NonCompliantDevice,
    ExcessiveRisk,
}

impl DenyReason {
    pub fn code(&self) -> &'static str {
        match self {
            DenyReason::MissingCredential => "missing_credential",
            DenyReason::InvalidCredential => "invalid_credential",
            DenyReason::InsufficientScope => "insufficient_scope",
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::NonCompliantDevice => "non_compliant_device",
            DenyReason::ExcessiveRisk => "excessive_risk",
        }
    }

    /// The caller could not be identified (as opposed to identified but not permitted).
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            DenyReason::MissingCredential | DenyReason::InvalidCredential
        )
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DenyReason::MissingCredential => "missing bearer token",
            DenyReason::InvalidCredential => "invalid token",
            DenyReason::InsufficientScope => "insufficient scope",
            DenyReason::InsufficientRole => "insufficient role",
            DenyReason::NonCompliantDevice => "device not compliant",
            DenyReason::ExcessiveRisk => "risk too high",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow(VerifiedCredential),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow(_) => None,
            Decision::Deny(reason) => Some(*reason),
        }
    }
}
