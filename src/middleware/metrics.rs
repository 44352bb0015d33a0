//! Prometheus request metrics.
//!
//! - `zt_requests_total{path,method,status}`: counter
//! - `zt_request_latency_seconds{path}`: histogram
//!
//! `path` is the matched route template (`/api/v1/orders`), or `unmatched`
//! for requests no route accepted, so label cardinality stays bounded.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

/// Per-process registry. Owned by `AppState`, so every router instance gets its own.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    requests: IntCounterVec,
    latency: HistogramVec,
}

impl fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMetrics").finish_non_exhaustive()
    }
}

impl HttpMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new("zt_requests_total", "HTTP requests"),
            &["path", "method", "status"],
        )?;
        let latency = HistogramVec::new(
            HistogramOpts::new("zt_request_latency_seconds", "HTTP request latency"),
            &["path"],
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(latency.clone()))?;

        Ok(Self {
            registry,
            requests,
            latency,
        })
    }

    pub fn observe(&self, path: &str, method: &str, status: u16, elapsed: Duration) {
        self.requests
            .with_label_values(&[path, method, &status.to_string()])
            .inc();
        self.latency
            .with_label_values(&[path])
            .observe(elapsed.as_secs_f64());
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

pub async fn track_requests(
    State(metrics): State<Arc<HttpMetrics>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = req.method().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    metrics.observe(
        &path,
        method.as_str(),
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}
