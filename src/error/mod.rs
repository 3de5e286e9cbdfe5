//! Application error types mapped onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repositories::StoreError;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Application-level errors.
///
/// Gate failures (`Unauthenticated`, `Forbidden`) render as a bare status code;
/// everything else carries a `{"message": ...}` body.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad credentials at login.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// No bearer token on a protected route.
    #[error("Missing bearer token")]
    Unauthenticated,

    /// Bearer token failed verification or no longer maps to a user.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Unauthenticated => {
                tracing::debug!("rejected request: missing bearer token");
                return status.into_response();
            }
            AppError::Forbidden(reason) => {
                tracing::debug!(%reason, "rejected request: invalid bearer token");
                return status.into_response();
            }
            AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg) => msg,
            AppError::Store(StoreError::Duplicate(field)) => {
                tracing::debug!(%field, "unique constraint hit on insert");
                "Username or email already exists".to_string()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                INTERNAL_MESSAGE.to_string()
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: AppError) -> (StatusCode, Vec<u8>) {
        let res = err.into_response();
        let status = res.status();
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn gate_errors_have_empty_bodies() {
        let (status, body) = body_of(AppError::Unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());

        let (status, body) = body_of(AppError::Forbidden("bad signature".into())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let (status, body) =
            body_of(AppError::Internal(anyhow::anyhow!("connection refused on 5432"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn duplicate_store_error_is_conflict() {
        let (status, _) = body_of(AppError::Store(StoreError::Duplicate("email".into()))).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }
}
