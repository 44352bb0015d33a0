use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Key material used to sign access tokens.
#[derive(Clone)]
pub enum SigningKeyConfig {
    /// `ACCESS_JWT_PRIVATE_KEY_PEM`: Ed25519 PKCS#8 PEM (EdDSA)
    Ed25519PrivatePem(String),
    /// `ACCESS_JWT_SECRET`: shared secret (HS256)
    SharedSecret(String),
}

impl fmt::Debug for SigningKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            SigningKeyConfig::Ed25519PrivatePem(_) => f.write_str("Ed25519PrivatePem(..)"),
            SigningKeyConfig::SharedSecret(_) => f.write_str("SharedSecret(..)"),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub issuer: String,
    pub audience: String,
    // AS signs access tokens with this key
    pub signing_key: SigningKeyConfig,
    pub signing_kid: Option<String>,
    // Token lifetime (seconds)
    pub access_token_ttl_seconds: u64,
    // Stub login: every username is accepted with this password
    pub demo_password: String,
    pub tenant: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("signing_key", &self.signing_key)
            .field("signing_kid", &self.signing_kid)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("AUTH_PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("AUTH_PORT"))?,
            None => 9000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("AUTH_PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let issuer = non_empty("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let audience = non_empty("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let signing_key = match (
            non_empty("ACCESS_JWT_PRIVATE_KEY_PEM"),
            non_empty("ACCESS_JWT_SECRET"),
        ) {
            (Some(pem), _) => SigningKeyConfig::Ed25519PrivatePem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => SigningKeyConfig::SharedSecret(secret),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PRIVATE_KEY_PEM")),
        };
        let signing_kid = non_empty("ACCESS_JWT_KID");

        let access_token_ttl_seconds = match non_empty("ACCESS_TOKEN_TTL_SECONDS") {
            Some(v) => v
                .trim()
                .parse()
                .ok()
                .filter(|ttl: &u64| *ttl > 0)
                .ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))?,
            None => 600, // 10 min
        };

        // The well-known demo password is only acceptable outside production.
        let demo_password = match non_empty("DEMO_PASSWORD") {
            Some(p) => p,
            None if app_env.is_production() => return Err(ConfigError::Missing("DEMO_PASSWORD")),
            None => "pass".to_string(),
        };

        let tenant = non_empty("TOKEN_TENANT").unwrap_or_else(|| "demo-tenant".to_string());

        Ok(Config {
            addr,
            app_env,
            issuer,
            audience,
            signing_key,
            signing_kid,
            access_token_ttl_seconds,
            demo_password,
            tenant,
        })
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        tracing::error!(error = %e, "configuration error");
        AppError::Internal
    }
}
