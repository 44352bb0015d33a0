/*
 * Responsibility
 * - Orders response DTOs
 */
use serde::Serialize;

use crate::api::v1::extractors::AuthCtx;
use crate::repos::order_repo::OrderRow;
use crate::services::policy::{Role, Scope};

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub total: f64,
}

impl From<OrderRow> for OrderResponse {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            total: row.total_cents as f64 / 100.0,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CallerResponse {
    pub sub: String,
    pub role: Role,
    pub scp: Vec<Scope>,
    pub tenant: Option<String>,
}

impl From<AuthCtx> for CallerResponse {
    fn from(ctx: AuthCtx) -> Self {
        Self {
            sub: ctx.subject,
            role: ctx.role,
            scp: ctx.scopes,
            tenant: ctx.tenant,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListOrdersResponse {
    pub caller: CallerResponse,
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub ok: bool,
    pub created: String,
    pub created_by: String,
}
