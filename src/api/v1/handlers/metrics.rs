/*
 * Responsibility
 * - GET /metrics (Prometheus scrape, never guarded)
 */
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::{error::AppError, state::AppState};

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render().map_err(|e| {
        tracing::error!(error = %e, "failed to encode metrics");
        AppError::Internal
    })?;

    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}
