/*
 * Responsibility
 * - Public interface of the middleware layer
 * - auth::access::protect(...) guards a route; http/cors/security_headers::apply(...) wrap the Router
 * - metrics::HttpMetrics backs GET /metrics
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod metrics;
pub mod security_headers;
