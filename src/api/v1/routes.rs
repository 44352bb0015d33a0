/*
 * Responsibility
 * - URL layout of v1
 * - Each protected route is wrapped by the guard with its own operation's requirement
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    admin::read_audit_log,
    health::health,
    orders::{create_order, list_orders},
};
use crate::middleware::auth::access::protect;
use crate::services::policy::Operation;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/orders",
            protect(get(list_orders), state, Operation::ListOrders),
        )
        .route(
            "/orders",
            protect(post(create_order), state, Operation::CreateOrder),
        )
        .route(
            "/admin/audit",
            protect(get(read_audit_log), state, Operation::ReadAuditLog),
        )
}
