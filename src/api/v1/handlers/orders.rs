/*
 * Responsibility
 * - /orders handlers
 * - Reached only after the guard allowed the request; AuthCtx identifies the caller
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::orders::{CreateOrderResponse, ListOrdersResponse, OrderResponse},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

const NEW_ORDER_TOTAL_CENTS: u64 = 999;

pub async fn list_orders(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<ListOrdersResponse>, AppError> {
    let orders = state
        .orders
        .list()?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(Json(ListOrdersResponse {
        caller: ctx.into(),
        orders,
    }))
}

pub async fn create_order(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let row = state.orders.create(NEW_ORDER_TOTAL_CENTS)?;

    tracing::info!(order_id = %row.id, tenant = ?ctx.tenant, jti = ?ctx.jti, "order created");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            ok: true,
            created: row.id,
            created_by: ctx.subject,
        }),
    ))
}
