/*
 * Responsibility
 * - Load Config -> build services -> assemble the Router
 * - Apply middleware (HTTP limits / tracing / request metrics, security headers, CORS)
 * - Serve with axum::serve() until Ctrl-C
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::{health::health, metrics::metrics};
use crate::config::Config;
use crate::middleware;
use crate::middleware::metrics::HttpMetrics;
use crate::repos::order_repo::OrderRepo;
use crate::services::audit::AuditTrail;
use crate::services::auth::build_decision_point;
use crate::services::policy::PolicyTable;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,orders_api=debug,audit=info,tower_http=debug cargo run
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

        // Development: crash the whole process so the panic is noticed immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting orders API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("orders API stopped");
    Ok(())
}

/// Build process-level services. Any policy misconfiguration stops startup here.
pub fn build_state(config: &Config) -> Result<AppState> {
    let pdp = build_decision_point(config)?;

    let policies = match &config.policy_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let table = PolicyTable::from_json(&json)?;
            tracing::info!(path = %path.display(), "loaded policy file");
            table
        }
        None => PolicyTable::defaults()?,
    };

    Ok(AppState::new(
        pdp,
        policies,
        OrderRepo::seeded(),
        Arc::new(AuditTrail::new()),
        HttpMetrics::new()?,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let http_metrics = state.metrics.clone();

    let router = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", api::v1::routes(&state))
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config, http_metrics)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
