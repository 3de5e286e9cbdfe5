//! Auth HTTP handlers: register, login. Both bypass the auth gate.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use validator::Validate;

use crate::auth::PasswordService;
use crate::error::{AppError, AppResult};
use crate::handlers::extract::ValidatedJson;
use crate::handlers::http::AppState;
use crate::models::NewUser;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let existing = state
        .users()
        .user_find_by_username_or_email(&body.username, &body.email)
        .await?;
    if existing.is_some() {
        debug!(username = %body.username, "registration rejected: identity taken");
        return Err(AppError::Conflict(
            "Username or email already exists".to_string(),
        ));
    }

    let password_hash = PasswordService::hash_password_async(body.password).await?;
    let user = state
        .users()
        .user_create(NewUser {
            username: body.username,
            email: body.email,
            password_hash,
        })
        .await?;
    info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .users()
        .user_find_by_username(&body.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    if !PasswordService::verify_password_async(body.password, user.password_hash).await? {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.jwt().issue(user.id)?;
    debug!(user_id = %user.id, "token issued");
    Ok(Json(LoginResponse { token }))
}
