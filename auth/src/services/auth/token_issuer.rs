use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::services::auth::jwt::JwtIssuer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
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
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "reader" => Ok(Role::Reader),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::InvalidRequest(format!("unknown role: {other}"))),
        }
    }
}

/// Capabilities granted with each role.
pub fn scopes_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::Reader => &["orders:read"],
        Role::Admin => &["orders:read", "orders:write"],
    }
}

#[derive(Debug, Serialize)]
struct AccessTokenClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    sub: &'a str,
    role: Role,
    scp: &'static [&'static str],
    tenant: &'a str,
    jti: String,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Clone, Debug)]
pub struct TokenIssuer {
    jwt: JwtIssuer,
    tenant: String,
}

impl TokenIssuer {
    pub fn new(jwt: JwtIssuer, tenant: impl Into<String>) -> Self {
        Self {
            jwt,
            tenant: tenant.into(),
        }
    }

    pub fn issue_access_token(&self, sub: &str, role: Role) -> Result<IssuedToken, AppError> {
        self.issue_access_token_at(sub, role, Utc::now())
    }

    /// Issue an access token as of `now`.
    pub fn issue_access_token_at(
        &self,
        sub: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        if sub.trim().is_empty() {
            return Err(AppError::InvalidRequest("sub must not be empty".to_string()));
        }

        let iat = now.timestamp();
        let ttl = self.jwt.ttl_seconds();

        let claims = AccessTokenClaims {
            iss: self.jwt.issuer(),
            aud: self.jwt.audience(),
            iat,
            exp: iat.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)),
            sub,
            role,
            scp: scopes_for(role),
            tenant: &self.tenant,
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = self.jwt.sign(&claims)?;
        tracing::info!(sub, role = %role, jti = %claims.jti, "issued access token");

        Ok(IssuedToken {
            access_token,
            expires_in: ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{Algorithm, DecodingKey, Validation};
    use serde_json::Value;

    use super::*;
    use crate::services::auth::jwt::SigningKey;

    fn issuer() -> TokenIssuer {
        let key = SigningKey::hmac(b"unit-test-secret").unwrap();
        let jwt = JwtIssuer::new(key, "demo-auth".into(), "orders-api".into(), 600);
        TokenIssuer::new(jwt, "demo-tenant")
    }

    fn claims_of(token: &str) -> Value {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["orders-api"]);
        validation.validate_exp = false;
        jsonwebtoken::decode::<Value>(
            token,
            &DecodingKey::from_secret(b"unit-test-secret"),
            &validation,
        )
        .unwrap()
        .claims
    }

    #[test]
    fn role_grants_fixed_scopes() {
        assert_eq!(scopes_for(Role::Reader), &["orders:read"]);
        assert_eq!(scopes_for(Role::Admin), &["orders:read", "orders:write"]);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn issued_claims_are_complete() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let issued = issuer().issue_access_token_at("alice", Role::Admin, now).unwrap();
        let claims = claims_of(&issued.access_token);

        assert_eq!(issued.expires_in, 600);
        assert_eq!(claims["iss"], "demo-auth");
        assert_eq!(claims["aud"], "orders-api");
        assert_eq!(claims["sub"], "alice");
        assert_eq!(claims["role"], "admin");
        assert_eq!(claims["scp"], serde_json::json!(["orders:read", "orders:write"]));
        assert_eq!(claims["tenant"], "demo-tenant");
        assert_eq!(claims["iat"], 1_700_000_000);
        assert_eq!(claims["exp"], 1_700_000_600);
        assert!(claims["jti"].as_str().is_some_and(|j| !j.is_empty()));
    }

    #[test]
    fn every_token_gets_a_fresh_jti() {
        let issuer = issuer();
        let a = claims_of(&issuer.issue_access_token("alice", Role::Reader).unwrap().access_token);
        let b = claims_of(&issuer.issue_access_token("alice", Role::Reader).unwrap().access_token);
        assert_ne!(a["jti"], b["jti"]);
    }
}
