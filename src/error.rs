/*
 * Responsibility
 * - Application-wide AppError
 * - IntoResponse (HTTP status / JSON error body)
 * - Convert DenyReason / RepoError uniformly (401 vs 403 is decided here)
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::policy::DenyReason;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(DenyReason),
    #[error("{0}")]
    Forbidden(DenyReason),
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.code()),
            AppError::Forbidden(reason) => (StatusCode::FORBIDDEN, reason.code()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };

        let challenge = match &self {
            AppError::Unauthorized(DenyReason::InvalidCredential) => {
                Some(HeaderValue::from_static("Bearer error=\"invalid_token\""))
            }
            AppError::Unauthorized(_) => Some(HeaderValue::from_static("Bearer")),
            _ => None,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(challenge) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, challenge);
        }
        response
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        if reason.is_authentication_failure() {
            AppError::Unauthorized(reason)
        } else {
            AppError::Forbidden(reason)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Poisoned => AppError::Internal,
        }
    }
}
