//! Auth gate: bearer token → verified user id → resolved identity on the request.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::CurrentUser;

/// Second space-separated segment of `Authorization` (`Bearer <token>`).
///
/// Only a missing header or a missing segment count as "no token"; the scheme
/// word is not checked, so `Basic abc` yields `abc` and fails verification.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(' ').nth(1))
}

/// Middleware for protected routes.
///
/// No token → 401. Bad signature or expired → 403. User lookup failure → 500.
/// A valid token whose user no longer exists is rejected with 403.
/// On success the [`CurrentUser`] is inserted into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = {
        let token = bearer_token(request.headers()).ok_or(AppError::Unauthenticated)?;
        state.jwt().verify(token)?
    };

    let user = state.users().user_get_by_id(user_id).await?.ok_or_else(|| {
        warn!(%user_id, "valid token for unknown user");
        AppError::Forbidden(format!("user {} not found", user_id))
    })?;

    request.extensions_mut().insert(CurrentUser::from(user));
    Ok(next.run(request).await)
}
