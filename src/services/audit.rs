/*
 * Responsibility
 * - Audit event for every policy decision (operation, method, path, timestamp, outcome)
 * - AuditSink seam; AuditTrail logs through tracing, keeps per-outcome counters
 *   and can forward to another sink
 *
 * Notes
 * - Events never carry the subject, the token or any claim payload
 */
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::policy::{Decision, DenyReason, Operation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum AuditOutcome {
    Allow,
    Deny(DenyReason),
}

impl AuditOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            AuditOutcome::Allow => "allow",
            AuditOutcome::Deny(reason) => reason.code(),
        }
    }
}

impl From<&Decision> for AuditOutcome {
    fn from(decision: &Decision) -> Self {
        match decision.deny_reason() {
            None => AuditOutcome::Allow,
            Some(reason) => AuditOutcome::Deny(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub at: DateTime<Utc>,
    pub operation: &'static str,
    pub method: String,
    pub path: String,
    #[serde(flatten)]
    pub outcome: AuditOutcome,
}

impl AuditEvent {
    pub fn new(
        operation: Operation,
        method: impl Into<String>,
        path: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            at: Utc::now(),
            operation: operation.as_str(),
            method: method.into(),
            path: path.into(),
            outcome,
        }
    }
}

/// Consumer of policy decisions.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: &AuditEvent);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditCount {
    pub operation: &'static str,
    pub outcome: &'static str,
    pub count: u64,
}

/// Default sink: structured `tracing` events on target `audit` plus in-memory counters.
/// Optionally forwards every event to a downstream sink.
#[derive(Default)]
pub struct AuditTrail {
    counts: Mutex<BTreeMap<(&'static str, &'static str), u64>>,
    forward: Option<Arc<dyn AuditSink>>,
}

impl fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditTrail")
            .field("forwarding", &self.forward.is_some())
            .finish_non_exhaustive()
    }
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forwarding_to(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            counts: Mutex::default(),
            forward: Some(sink),
        }
    }

    pub fn snapshot(&self) -> Vec<AuditCount> {
        let counts = match self.counts.lock() {
            Ok(counts) => counts,
            Err(poisoned) => poisoned.into_inner(),
        };

        counts
            .iter()
            .map(|(&(operation, outcome), &count)| AuditCount {
                operation,
                outcome,
                count,
            })
            .collect()
    }
}

impl AuditSink for AuditTrail {
    fn record(&self, event: &AuditEvent) {
        match event.outcome {
            AuditOutcome::Allow => tracing::info!(
                target: "audit",
                event_id = %event.event_id,
                operation = event.operation,
                method = %event.method,
                path = %event.path,
                "access granted"
            ),
            AuditOutcome::Deny(reason) => tracing::warn!(
                target: "audit",
                event_id = %event.event_id,
                operation = event.operation,
                method = %event.method,
                path = %event.path,
                reason = reason.code(),
                "access denied"
            ),
        }

        let mut counts = match self.counts.lock() {
            Ok(counts) => counts,
            Err(poisoned) => poisoned.into_inner(),
        };
        *counts
            .entry((event.operation, event.outcome.code()))
            .or_insert(0) += 1;
        drop(counts);

        if let Some(forward) = &self.forward {
            forward.record(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_counts_per_operation_and_outcome() {
        let trail = AuditTrail::new();
        let deny = AuditOutcome::Deny(DenyReason::InsufficientScope);

        trail.record(&AuditEvent::new(Operation::ListOrders, "GET", "/api/v1/orders", AuditOutcome::Allow));
        trail.record(&AuditEvent::new(Operation::ListOrders, "GET", "/api/v1/orders", AuditOutcome::Allow));
        trail.record(&AuditEvent::new(Operation::CreateOrder, "POST", "/api/v1/orders", deny));

        assert_eq!(
            trail.snapshot(),
            vec![
                AuditCount { operation: "orders.read", outcome: "allow", count: 2 },
                AuditCount { operation: "orders.write", outcome: "insufficient_scope", count: 1 },
            ]
        );
    }

    #[test]
    fn outcome_follows_decision() {
        assert_eq!(
            AuditOutcome::from(&Decision::Deny(DenyReason::ExcessiveRisk)),
            AuditOutcome::Deny(DenyReason::ExcessiveRisk)
        );
        assert_eq!(AuditOutcome::Deny(DenyReason::ExcessiveRisk).code(), "excessive_risk");
    }

    #[test]
    fn trail_forwards_events_downstream() {
        #[derive(Default)]
        struct Collect(Mutex<Vec<AuditOutcome>>);
        impl AuditSink for Collect {
            fn record(&self, event: &AuditEvent) {
                self.0.lock().unwrap().push(event.outcome);
            }
        }

        let downstream = Arc::new(Collect::default());
        let trail = AuditTrail::forwarding_to(downstream.clone());
        trail.record(&AuditEvent::new(
            Operation::ListOrders,
            "GET",
            "/api/v1/orders",
            AuditOutcome::Deny(DenyReason::MissingCredential),
        ));

        assert_eq!(
            *downstream.0.lock().unwrap(),
            vec![AuditOutcome::Deny(DenyReason::MissingCredential)]
        );
    }

    #[test]
    fn event_serializes_reason_without_identity() {
        let event = AuditEvent::new(
            Operation::ReadAuditLog,
            "GET",
            "/api/v1/admin/audit",
            AuditOutcome::Deny(DenyReason::InsufficientRole),
        );
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["operation"], "admin.audit");
        assert_eq!(value["outcome"], "deny");
        assert_eq!(value["reason"], "insufficient_role");
        assert!(value.get("sub").is_none());
    }
}
