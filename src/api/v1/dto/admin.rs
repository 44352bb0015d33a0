use serde::Serialize;

use crate::services::audit::AuditCount;
use crate::services::policy::Role;

#[derive(Debug, Serialize)]
pub struct AuditCallerResponse {
    pub sub: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AuditLogResponse {
    pub ok: bool,
    pub message: &'static str,
    pub caller: AuditCallerResponse,
    pub events: Vec<AuditCount>,
}
