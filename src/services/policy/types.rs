/*
 * Responsibility
 * - Vocabulary shared by requirements, credentials and request context
 *   (Role / Scope / DeviceTrust / RiskLevel / RequestContext)
 * - Strict parsing (FromStr) for configuration, lenient parsing (from_signal) for request signals
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ConfigurationError;

/// Role carried by a credential. Exactly one per credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reader" => Ok(Role::Reader),
            "admin" => Ok(Role::Admin),
            other => Err(ConfigurationError::UnknownRole(other.to_string())),
        }
    }
}

/// Capability string granted to a credential (e.g. `orders:read`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for Scope {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Scope {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Device posture reported by device management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTrust {
    Managed,
    Unmanaged,
}

impl DeviceTrust {
    /// Interpret a caller-supplied signal. Only `managed` is trusted.
    pub fn from_signal(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("managed") {
            DeviceTrust::Managed
        } else {
            DeviceTrust::Unmanaged
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceTrust::Managed => "managed",
            DeviceTrust::Unmanaged => "unmanaged",
        }
    }
}

impl FromStr for DeviceTrust {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "managed" => Ok(DeviceTrust::Managed),
            "unmanaged" => Ok(DeviceTrust::Unmanaged),
            other => Err(ConfigurationError::UnknownDeviceTrust(other.to_string())),
        }
    }
}

/// Risk score bucket reported by risk scoring. Ordered from least to most risky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Interpret a caller-supplied signal. Unrecognised values count as `High`.
    pub fn from_signal(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case("low") {
            RiskLevel::Low
        } else if value.eq_ignore_ascii_case("medium") {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(ConfigurationError::UnknownRiskLevel(other.to_string())),
        }
    }
}

/// Out-of-band attributes supplied with a call. Not part of the credential.
///
/// `None` means the signal was not supplied at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub device_trust: Option<DeviceTrust>,
    pub risk_level: Option<RiskLevel>,
}

impl RequestContext {
    pub fn new(device_trust: Option<DeviceTrust>, risk_level: Option<RiskLevel>) -> Self {
        Self {
            device_trust,
            risk_level,
        }
    }
}
