//! Context supplier: pulls the bearer token and the out-of-band device/risk
//! signals off the request headers and hands them to the PDP as plain values.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};

use crate::services::policy::{DeviceTrust, RequestContext, RiskLevel};

pub const DEVICE_TRUST_HEADER: HeaderName = HeaderName::from_static("x-device-trust");
pub const RISK_HEADER: HeaderName = HeaderName::from_static("x-risk");

/// `Authorization: Bearer <token>`. Any other scheme counts as no credential.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
}

/// Absent or blank headers stay `None`; unreadable values take the least-trusted reading.
pub fn request_context(headers: &HeaderMap) -> RequestContext {
    let device_trust = read_signal(
        headers,
        DEVICE_TRUST_HEADER,
        DeviceTrust::from_signal,
        DeviceTrust::Unmanaged,
    );
    let risk_level = read_signal(headers, RISK_HEADER, RiskLevel::from_signal, RiskLevel::High);

    RequestContext::new(device_trust, risk_level)
}

fn read_signal<T>(
    headers: &HeaderMap,
    name: HeaderName,
    parse: fn(&str) -> T,
    unreadable: T,
) -> Option<T> {
    match headers.get(name).map(HeaderValue::to_str) {
        None => None,
        Some(Ok(value)) if value.trim().is_empty() => None,
        Some(Ok(value)) => Some(parse(value)),
        Some(Err(_)) => Some(unreadable),
    }
}
