//! Policy enforcement for protected routes.
//!
//! Every guarded request goes through the same steps:
//! - read the bearer token and the device/risk signals from the headers
//! - ask the PDP for a decision against the route's requirement
//! - record an audit event (allow and deny alike)
//! - on allow, put `AuthCtx` into request extensions; on deny, answer 401/403

use axum::{
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::middleware::auth::context::{bearer_token, request_context};
use crate::services::audit::{AuditEvent, AuditOutcome, AuditSink};
use crate::services::policy::{Decision, Operation};
use crate::state::AppState;

#[derive(Clone)]
struct PolicyGuard {
    state: AppState,
    operation: Operation,
}

/// Guard `route` with the requirement configured for `operation`.
///
/// Example:
/// ```ignore
/// Router::new()
///     .route("/orders", protect(get(list_orders), &state, Operation::ListOrders))
///     .route("/orders", protect(post(create_order), &state, Operation::CreateOrder))
/// ```
pub fn protect(
    route: MethodRouter<AppState>,
    state: &AppState,
    operation: Operation,
) -> MethodRouter<AppState> {
    let guard = PolicyGuard {
        state: state.clone(),
        operation,
    };
    route.route_layer(middleware::from_fn_with_state(guard, access_middleware))
}

async fn access_middleware(
    State(guard): State<PolicyGuard>,
    OriginalUri(original_uri): OriginalUri,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let requirement = guard.state.policies.requirement(guard.operation);

    let decision = {
        let headers = req.headers();
        let context = request_context(headers);
        guard
            .state
            .pdp
            .evaluate(bearer_token(headers), &context, requirement)
    };

    guard.state.audit.record(&AuditEvent::new(
        guard.operation,
        req.method().as_str(),
        original_uri.path(),
        AuditOutcome::from(&decision),
    ));

    match decision {
        Decision::Allow(credential) => {
            req.extensions_mut().insert(AuthCtx::from(credential));
            Ok(next.run(req).await)
        }
        Decision::Deny(reason) => Err(AppError::from(reason)),
    }
}
