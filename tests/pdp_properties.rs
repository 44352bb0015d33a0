mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use orders_api::services::auth::build_decision_point;
use orders_api::services::policy::{
    Decision, DenyReason, DeviceTrust, PolicyDecisionPoint, PolicyRequirement, RequestContext,
    RiskLevel, Role,
};
use proptest::prelude::*;
use serde_json::json;

fn pdp() -> Arc<PolicyDecisionPoint> {
    build_decision_point(&common::config()).unwrap()
}

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn token_at(role: Role, scopes: &[&str], exp: DateTime<Utc>) -> String {
    common::sign(&json!({
        "iss": common::ISSUER,
        "aud": common::AUDIENCE,
        "sub": "prop-user",
        "iat": (exp - Duration::minutes(10)).timestamp(),
        "exp": exp.timestamp(),
        "role": role,
        "scp": scopes,
    }))
}

fn token(role: Role, scopes: &[&str]) -> String {
    token_at(role, scopes, now() + Duration::minutes(10))
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Reader), Just(Role::Admin)]
}

fn device() -> impl Strategy<Value = DeviceTrust> {
    prop_oneof![Just(DeviceTrust::Managed), Just(DeviceTrust::Unmanaged)]
}

fn risk() -> impl Strategy<Value = RiskLevel> {
    prop_oneof![Just(RiskLevel::Low), Just(RiskLevel::Medium), Just(RiskLevel::High)]
}

fn context() -> impl Strategy<Value = RequestContext> {
    (proptest::option::of(device()), proptest::option::of(risk()))
        .prop_map(|(device, risk)| RequestContext::new(device, risk))
}

fn scope_name() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("orders:read"), Just("orders:write"), Just("reports:read")]
}

/// Any requirement the builder accepts.
fn requirement() -> impl Strategy<Value = PolicyRequirement> {
    (
        proptest::option::of(scope_name()),
        proptest::option::of(role()),
        proptest::option::of(device()),
        proptest::collection::btree_set(risk(), 0..3),
        any::<bool>(),
    )
        .prop_filter_map(
            "builder rejected requirement",
            |(scope, role, device, denied, require_risk)| {
                let mut builder = PolicyRequirement::builder();
                if let Some(scope) = scope {
                    builder = builder.scope(scope);
                }
                if let Some(role) = role {
                    builder = builder.role(role);
                }
                if let Some(device) = device {
                    builder = builder.device_trust(device);
                }
                for level in denied {
                    builder = builder.deny_risk(level);
                }
                if require_risk {
                    builder = builder.require_risk_signal();
                }
                builder.build().ok()
            },
        )
}

proptest! {
    #[test]
    fn missing_token_is_always_missing_credential(
        req in requirement(),
        ctx in context(),
        blank in prop_oneof![Just(None), Just(Some("")), Just(Some("   "))],
    ) {
        let decision = pdp().evaluate_at(blank, &ctx, &req, now());
        prop_assert_eq!(decision, Decision::Deny(DenyReason::MissingCredential));
    }

    #[test]
    fn missing_scope_wins_over_role_and_context(
        granted in proptest::sample::subsequence(vec!["orders:read", "profile:read"], 0..=2),
        token_role in role(),
        required_role in proptest::option::of(role()),
        required_device in proptest::option::of(device()),
        ctx in context(),
    ) {
        let mut builder = PolicyRequirement::builder().scope("orders:write");
        if let Some(role) = required_role {
            builder = builder.role(role);
        }
        if let Some(device) = required_device {
            builder = builder.device_trust(device);
        }
        let req = builder.deny_risk(RiskLevel::High).build().unwrap();

        let token = token(token_role, &granted);
        let decision = pdp().evaluate_at(Some(&token), &ctx, &req, now());
        prop_assert_eq!(decision, Decision::Deny(DenyReason::InsufficientScope));
    }

    #[test]
    fn device_is_reported_before_risk(
        presented_device in prop_oneof![Just(None), Just(Some(DeviceTrust::Unmanaged))],
        presented_risk in proptest::option::of(risk()),
        require_risk in any::<bool>(),
    ) {
        let mut builder = PolicyRequirement::builder()
            .scope("orders:read")
            .role(Role::Admin)
            .device_trust(DeviceTrust::Managed)
            .max_risk(RiskLevel::Low);
        if require_risk {
            builder = builder.require_risk_signal();
        }
        let req = builder.build().unwrap();

        let ctx = RequestContext::new(presented_device, presented_risk);
        let token = token(Role::Admin, &["orders:read", "orders:write"]);
        let decision = pdp().evaluate_at(Some(&token), &ctx, &req, now());
        prop_assert_eq!(decision, Decision::Deny(DenyReason::NonCompliantDevice));
    }

    #[test]
    fn evaluation_is_idempotent(
        req in requirement(),
        ctx in context(),
        token_role in role(),
        granted in proptest::sample::subsequence(vec!["orders:read", "orders:write"], 0..=2),
    ) {
        let pdp = pdp();
        let token = token(token_role, &granted);

        let first = pdp.evaluate_at(Some(&token), &ctx, &req, now());
        let second = pdp.evaluate_at(Some(&token), &ctx, &req, now());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tampered_signature_is_always_invalid(
        req in requirement(),
        ctx in context(),
        position in 0usize..40,
        replacement in proptest::char::ranges(vec!['A'..='Z', 'a'..='z', '0'..='9'].into()),
    ) {
        let token = token(Role::Admin, &["orders:read", "orders:write", "reports:read"]);
        let (signed, signature) = token.rsplit_once('.').unwrap();

        let mut chars: Vec<char> = signature.chars().collect();
        prop_assume!(chars[position] != replacement);
        chars[position] = replacement;
        let tampered = format!("{signed}.{}", chars.into_iter().collect::<String>());

        let decision = pdp().evaluate_at(Some(&tampered), &ctx, &req, now());
        prop_assert_eq!(decision, Decision::Deny(DenyReason::InvalidCredential));
    }

    #[test]
    fn any_past_expiry_is_invalid(
        req in requirement(),
        ctx in context(),
        seconds_ago in 0i64..1_000_000_000,
    ) {
        let token = token_at(
            Role::Admin,
            &["orders:read", "orders:write", "reports:read"],
            now() - Duration::seconds(seconds_ago),
        );

        let decision = pdp().evaluate_at(Some(&token), &ctx, &req, now());
        prop_assert_eq!(decision, Decision::Deny(DenyReason::InvalidCredential));
    }
}

fn demo_requirement(scope: &str) -> PolicyRequirement {
    PolicyRequirement::builder()
        .scope(scope)
        .device_trust(DeviceTrust::Managed)
        .max_risk(RiskLevel::Medium)
        .build()
        .unwrap()
}

#[test]
fn reader_on_managed_low_risk_device_is_allowed() {
    let token = token(Role::Reader, &["orders:read"]);
    let ctx = RequestContext::new(Some(DeviceTrust::Managed), Some(RiskLevel::Low));

    let decision = pdp().evaluate_at(Some(&token), &ctx, &demo_requirement("orders:read"), now());

    match decision {
        Decision::Allow(credential) => {
            assert_eq!(credential.subject, "prop-user");
            assert_eq!(credential.role, Role::Reader);
        }
        other => panic!("expected allow, got {other:?}"),
    }
}

#[test]
fn reader_cannot_write() {
    let token = token(Role::Reader, &["orders:read"]);
    let ctx = RequestContext::new(Some(DeviceTrust::Managed), Some(RiskLevel::Low));

    let decision = pdp().evaluate_at(Some(&token), &ctx, &demo_requirement("orders:write"), now());
    assert_eq!(decision, Decision::Deny(DenyReason::InsufficientScope));
}

#[test]
fn admin_without_device_signal_is_non_compliant() {
    let token = token(Role::Admin, &["orders:read", "orders:write"]);
    let req = PolicyRequirement::builder()
        .scope("orders:read")
        .device_trust(DeviceTrust::Managed)
        .build()
        .unwrap();

    let decision = pdp().evaluate_at(Some(&token), &RequestContext::default(), &req, now());
    assert_eq!(decision, Decision::Deny(DenyReason::NonCompliantDevice));
}

#[test]
fn admin_at_high_risk_is_denied() {
    let token = token(Role::Admin, &["orders:read", "orders:write"]);
    let ctx = RequestContext::new(Some(DeviceTrust::Managed), Some(RiskLevel::High));

    let decision = pdp().evaluate_at(Some(&token), &ctx, &demo_requirement("orders:read"), now());
    assert_eq!(decision, Decision::Deny(DenyReason::ExcessiveRisk));
}

#[test]
fn no_token_is_missing_credential() {
    let ctx = RequestContext::new(Some(DeviceTrust::Managed), Some(RiskLevel::Low));

    let decision = pdp().evaluate_at(None, &ctx, &demo_requirement("orders:read"), now());
    assert_eq!(decision, Decision::Deny(DenyReason::MissingCredential));
}
