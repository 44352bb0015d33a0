/*
 * Responsibility
 * - Static requirement per protected operation
 * - Defaults reproduce the demo conditional-access policy; a JSON policy file may override them
 * - Every operation always has a requirement, so lookups cannot fail at request time
 */
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigurationError;
use super::requirement::{PolicyRequirement, RequirementSpec};
use super::types::{DeviceTrust, RiskLevel, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListOrders,
    CreateOrder,
    ReadAuditLog,
}

impl Operation {
    pub const ALL: [Operation; 3] = [
        Operation::ListOrders,
        Operation::CreateOrder,
        Operation::ReadAuditLog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ListOrders => "orders.read",
            Operation::CreateOrder => "orders.write",
            Operation::ReadAuditLog => "admin.audit",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ConfigurationError::UnknownOperation(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    list_orders: PolicyRequirement,
    create_order: PolicyRequirement,
    read_audit_log: PolicyRequirement,
}

impl PolicyTable {
    pub fn defaults() -> Result<Self, ConfigurationError> {
        let conditional_access = || {
            PolicyRequirement::builder()
                .device_trust(DeviceTrust::Managed)
                .deny_risk(RiskLevel::High)
        };

        Ok(Self {
            list_orders: conditional_access().scope("orders:read").build()?,
            create_order: conditional_access().scope("orders:write").build()?,
            read_audit_log: conditional_access().role(Role::Admin).build()?,
        })
    }

    /// Overlay `{ "<operation>": RequirementSpec, ... }` on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let specs: BTreeMap<String, RequirementSpec> = serde_json::from_str(json)?;

        let mut table = Self::defaults()?;
        for (name, spec) in specs {
            let operation: Operation = name.parse()?;
            let requirement = PolicyRequirement::try_from(spec)?;
            table.set(operation, requirement);
        }

        Ok(table)
    }

    pub fn requirement(&self, operation: Operation) -> &PolicyRequirement {
        match operation {
            Operation::ListOrders => &self.list_orders,
            Operation::CreateOrder => &self.create_order,
            Operation::ReadAuditLog => &self.read_audit_log,
        }
    }

    pub fn set(&mut self, operation: Operation, requirement: PolicyRequirement) {
        let slot = match operation {
            Operation::ListOrders => &mut self.list_orders,
            Operation::CreateOrder => &mut self.create_order,
            Operation::ReadAuditLog => &mut self.read_audit_log,
        };
        *slot = requirement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::policy::types::Scope;

    #[test]
    fn defaults_match_the_demo_policy() {
        let table = PolicyTable::defaults().unwrap();

        let read = table.requirement(Operation::ListOrders);
        assert_eq!(read.scope(), Some(&Scope::from("orders:read")));
        assert_eq!(read.device_trust(), Some(DeviceTrust::Managed));
        assert!(read.disallows(RiskLevel::High));
        assert!(!read.disallows(RiskLevel::Medium));

        let write = table.requirement(Operation::CreateOrder);
        assert_eq!(write.scope(), Some(&Scope::from("orders:write")));

        let audit = table.requirement(Operation::ReadAuditLog);
        assert_eq!(audit.role(), Some(Role::Admin));
        assert_eq!(audit.scope(), None);
    }

    #[test]
    fn json_overrides_only_named_operations() {
        let table = PolicyTable::from_json(
            r#"{ "orders.read": { "scope": "orders:read", "max_risk": "low", "require_risk_signal": true } }"#,
        )
        .unwrap();

        let read = table.requirement(Operation::ListOrders);
        assert!(read.disallows(RiskLevel::Medium));
        assert!(read.requires_risk_signal());
        assert_eq!(read.device_trust(), None);

        assert_eq!(
            table.requirement(Operation::CreateOrder),
            PolicyTable::defaults()
                .unwrap()
                .requirement(Operation::CreateOrder)
        );
    }

    #[test]
    fn unknown_operation_fails() {
        let err = PolicyTable::from_json(r#"{ "orders.delete": { "role": "admin" } }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownOperation(op) if op == "orders.delete"));
    }

    #[test]
    fn undefined_role_fails() {
        let err = PolicyTable::from_json(r#"{ "admin.audit": { "role": "auditor" } }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownRole(_)));
    }

    #[test]
    fn empty_requirement_fails() {
        let err = PolicyTable::from_json(r#"{ "admin.audit": {} }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyRequirement));
    }

    #[test]
    fn unknown_field_fails() {
        let err = PolicyTable::from_json(r#"{ "admin.audit": { "roles": ["admin"] } }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPolicyFile(_)));
    }
}
