use std::{fs, path::PathBuf};

use auth_service::services::auth::{JwtIssuer, Role, SigningKey, TokenIssuer, scopes_for};
use chrono::{DateTime, Utc};
use clap::{ArgGroup, Parser};

/// Mint a signed access token for the orders API without running the auth service.
///
/// Claims match what `POST /api/v1/token` issues:
/// iss, aud, iat, exp, sub, role, scp (derived from role), tenant, jti.
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
#[command(group(ArgGroup::new("key").required(true).args(["secret", "private_key_pem"])))]
struct Args {
    /// Subject (username)
    #[arg(long)]
    user: String,

    /// reader | admin
    #[arg(long, default_value = "reader")]
    role: String,

    #[arg(long, default_value = "demo-auth")]
    issuer: String,

    #[arg(long, default_value = "orders-api")]
    audience: String,

    /// Shared HS256 secret
    #[arg(long)]
    secret: Option<String>,

    /// Path to an Ed25519 private key in PEM (PKCS#8); signs with EdDSA
    #[arg(long, value_name = "FILE")]
    private_key_pem: Option<PathBuf>,

    /// Key id placed in the token header
    #[arg(long)]
    kid: Option<String>,

    /// Lifetime in seconds
    #[arg(long, default_value_t = 600)]
    ttl: u64,

    #[arg(long, default_value = "demo-tenant")]
    tenant: String,

    /// Override iat (unix seconds). Default: now.
    #[arg(long)]
    iat: Option<i64>,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let role: Role = args.role.parse()?;

    let signing_key = match (&args.secret, &args.private_key_pem) {
        (Some(secret), _) => SigningKey::hmac(secret.as_bytes())?,
        (None, Some(path)) => SigningKey::ed25519_pem(&fs::read_to_string(path)?)?,
        (None, None) => return Err("either --secret or --private-key-pem is required".into()),
    };

    let mut jwt = JwtIssuer::new(signing_key, args.issuer, args.audience, args.ttl);
    if let Some(kid) = args.kid {
        jwt = jwt.with_kid(kid);
    }
    let issuer = TokenIssuer::new(jwt, args.tenant);

    let now = match args.iat {
        Some(iat) => DateTime::from_timestamp(iat, 0).ok_or("--iat is out of range")?,
        None => Utc::now(),
    };

    let token = issuer.issue_access_token_at(&args.user, role, now)?;

    if args.quiet {
        println!("{}", token.access_token);
        return Ok(());
    }

    println!("token: {}", token.access_token);
    println!("role: {}", role);
    println!("scp: {}", scopes_for(role).join(" "));
    println!("iat: {}", now.timestamp());
    println!("expires_in: {}", token.expires_in);

    Ok(())
}
