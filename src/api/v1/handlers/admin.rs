/*
 * Responsibility
 * - GET /admin/audit: decision counters from the audit trail (admin role only)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{
        dto::admin::{AuditCallerResponse, AuditLogResponse},
        extractors::AuthCtxExtractor,
    },
    state::AppState,
};

pub async fn read_audit_log(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Json<AuditLogResponse> {
    Json(AuditLogResponse {
        ok: true,
        message: "audit log access granted",
        caller: AuditCallerResponse {
            sub: ctx.subject,
            role: ctx.role,
        },
        events: state.audit.snapshot(),
    })
}
