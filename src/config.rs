/*
 * Responsibility
 * - Read settings from the environment (issuer/audience, verification key, policy file, HTTP limits)
 * - Validate them (missing or malformed values fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

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

/// Key material used to verify access tokens.
#[derive(Clone)]
pub enum AccessKeyConfig {
    /// `ACCESS_JWT_PUBLIC_KEY_PEM` (EdDSA)
    Ed25519PublicPem(String),
    /// `ACCESS_JWT_SECRET` (HS256)
    SharedSecret(String),
}

impl fmt::Debug for AccessKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            AccessKeyConfig::Ed25519PublicPem(_) => f.write_str("Ed25519PublicPem(..)"),
            AccessKeyConfig::SharedSecret(_) => f.write_str("SharedSecret(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_key: AccessKeyConfig,
    pub access_jwt_kid: Option<String>,
    pub access_token_nbf_leeway_seconds: u32,

    pub policy_file: Option<PathBuf>,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_issuer = non_empty("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience =
            non_empty("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        // Prefer the asymmetric key when both are present.
        let access_key = match (
            non_empty("ACCESS_JWT_PUBLIC_KEY_PEM"),
            non_empty("ACCESS_JWT_SECRET"),
        ) {
            (Some(pem), _) => AccessKeyConfig::Ed25519PublicPem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => AccessKeyConfig::SharedSecret(secret),
            (None, None) => return Err(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM")),
        };

        let access_jwt_kid = non_empty("ACCESS_JWT_KID");

        let access_token_nbf_leeway_seconds = parse_or(
            non_empty("ACCESS_TOKEN_NBF_LEEWAY_SECONDS"),
            30,
            "ACCESS_TOKEN_NBF_LEEWAY_SECONDS",
        )?;

        let policy_file = non_empty("POLICY_FILE").map(PathBuf::from);

        let request_timeout_seconds: u64 = parse_or(
            non_empty("REQUEST_TIMEOUT_SECONDS"),
            30,
            "REQUEST_TIMEOUT_SECONDS",
        )?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let request_body_limit_bytes = parse_or(
            non_empty("REQUEST_BODY_LIMIT_BYTES"),
            1024 * 1024,
            "REQUEST_BODY_LIMIT_BYTES",
        )?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            access_key,
            access_jwt_kid,
            access_token_nbf_leeway_seconds,
            policy_file,
            request_timeout: Duration::from_secs(request_timeout_seconds),
            request_body_limit_bytes,
        })
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    default: T,
    key: &'static str,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
