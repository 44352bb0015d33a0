use axum::Json;
use axum::extract::State;

use crate::api::v1::dto::{token_request::LoginRequest, token_response::TokenResponse};
use crate::error::AppError;
use crate::services::auth::Role;
use crate::state::AppState;

pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let username = state
        .authenticator
        .authenticate(&req.username, &req.password)?;
    let role: Role = req.role.parse()?;

    let out = state.issuer.issue_access_token(username, role)?;

    Ok(Json(TokenResponse {
        access_token: out.access_token,
        token_type: "bearer",
        expires_in: out.expires_in,
    }))
}
