/*
 * Responsibility
 * - Declarative requirement attached to one protected operation
 * - Validated once at construction (builder or RequirementSpec), immutable afterwards
 */
use std::collections::BTreeSet;

use serde::Deserialize;

use super::error::ConfigurationError;
use super::types::{DeviceTrust, RiskLevel, Role, Scope};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRequirement {
    scope: Option<Scope>,
    role: Option<Role>,
    device_trust: Option<DeviceTrust>,
    disallowed_risk: BTreeSet<RiskLevel>,
    require_risk_signal: bool,
}

impl PolicyRequirement {
    pub fn builder() -> PolicyRequirementBuilder {
        PolicyRequirementBuilder::default()
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn device_trust(&self) -> Option<DeviceTrust> {
        self.device_trust
    }

    pub fn requires_risk_signal(&self) -> bool {
        self.require_risk_signal
    }

    pub fn disallows(&self, level: RiskLevel) -> bool {
        self.disallowed_risk.contains(&level)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyRequirementBuilder {
    scope: Option<Scope>,
    role: Option<Role>,
    device_trust: Option<DeviceTrust>,
    disallowed_risk: BTreeSet<RiskLevel>,
    require_risk_signal: bool,
}

impl PolicyRequirementBuilder {
    pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn device_trust(mut self, device_trust: DeviceTrust) -> Self {
        self.device_trust = Some(device_trust);
        self
    }

    pub fn deny_risk(mut self, level: RiskLevel) -> Self {
        self.disallowed_risk.insert(level);
        self
    }

    /// Disallow every level strictly above `level`.
    pub fn max_risk(mut self, level: RiskLevel) -> Self {
        self.disallowed_risk
            .extend(RiskLevel::ALL.into_iter().filter(|l| *l > level));
        self
    }

    /// Treat a missing risk signal as disqualifying.
    pub fn require_risk_signal(mut self) -> Self {
        self.require_risk_signal = true;
        self
    }

    pub fn build(self) -> Result<PolicyRequirement, ConfigurationError> {
        if self.scope.as_ref().is_some_and(Scope::is_blank) {
            return Err(ConfigurationError::EmptyScope);
        }
        if self.disallowed_risk.len() == RiskLevel::ALL.len() {
            return Err(ConfigurationError::UnsatisfiableRiskPolicy);
        }

        let has_check = self.scope.is_some()
            || self.role.is_some()
            || self.device_trust.is_some()
            || !self.disallowed_risk.is_empty()
            || self.require_risk_signal;
        if !has_check {
            return Err(ConfigurationError::EmptyRequirement);
        }

        Ok(PolicyRequirement {
            scope: self.scope,
            role: self.role,
            device_trust: self.device_trust,
            disallowed_risk: self.disallowed_risk,
            require_risk_signal: self.require_risk_signal,
        })
    }
}

/// Serialized form of a requirement, as found in a policy file.
///
/// Enum values are plain strings here so that an unknown value is reported
/// as a `ConfigurationError` naming the offending value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequirementSpec {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub device_trust: Option<String>,
    #[serde(default)]
    pub disallowed_risk: Vec<String>,
    #[serde(default)]
    pub max_risk: Option<String>,
    #[serde(default)]
    pub require_risk_signal: bool,
}

impl TryFrom<RequirementSpec> for PolicyRequirement {
    type Error = ConfigurationError;

    fn try_from(spec: RequirementSpec) -> Result<Self, Self::Error> {
        let mut builder = PolicyRequirement::builder();

        if let Some(scope) = spec.scope {
            builder = builder.scope(scope);
        }
        if let Some(role) = spec.role {
            builder = builder.role(role.parse()?);
        }
        if let Some(device_trust) = spec.device_trust {
            builder = builder.device_trust(device_trust.parse()?);
        }
        for level in &spec.disallowed_risk {
            builder = builder.deny_risk(level.parse()?);
        }
        if let Some(level) = spec.max_risk {
            builder = builder.max_risk(level.parse()?);
        }
        if spec.require_risk_signal {
            builder = builder.require_risk_signal();
        }

        builder.build()
    }
}
