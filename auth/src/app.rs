use std::{panic, process, sync::Arc};

use axum::{Router, routing::get};
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::{Config, SigningKeyConfig};
use crate::error::AppError;
use crate::services::auth::{Authenticator, JwtIssuer, KeyError, SigningKey, TokenIssuer};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_service=debug,tower_http=debug cargo run -p auth-service
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting auth service in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind");
            AppError::Internal
        })?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|_| AppError::Internal)?;

    Ok(())
}

pub fn build_signing_key(config: &Config) -> Result<SigningKey, KeyError> {
    match &config.signing_key {
        SigningKeyConfig::Ed25519PrivatePem(pem) => SigningKey::ed25519_pem(pem),
        SigningKeyConfig::SharedSecret(secret) => SigningKey::hmac(secret.as_bytes()),
    }
}

pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let mut jwt = JwtIssuer::new(
        build_signing_key(config)?,
        config.issuer.clone(),
        config.audience.clone(),
        config.access_token_ttl_seconds,
    );
    if let Some(kid) = &config.signing_kid {
        jwt = jwt.with_kid(kid.clone());
    }

    let issuer = Arc::new(TokenIssuer::new(jwt, config.tenant.clone()));
    let authenticator = Arc::new(Authenticator::new(config.demo_password.clone()));

    Ok(AppState::new(issuer, authenticator))
}

pub fn build_router(state: AppState) -> Router {
    // Access log: one span per request, one event per response with status + latency.
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state)
        .layer(trace)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
