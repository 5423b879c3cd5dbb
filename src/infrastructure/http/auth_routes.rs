//! Auth API routes

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::{require_user, store_error};
use crate::application::dto::LoginRequestDto;
use crate::application::services::AuthError;
use crate::domain::entities::User;
use crate::infrastructure::state::AppState;

/// Sign in with email and password
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequestDto>,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = state
        .auth_service
        .login(&req.email, &req.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message),
            e @ AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
            AuthError::Store(e) => store_error(e),
        })?;

    Ok(Json(user))
}

/// Sign out
pub async fn logout(State(state): State<Arc<AppState>>) -> StatusCode {
    state.auth_service.logout().await;
    StatusCode::NO_CONTENT
}

/// Get the signed-in user
pub async fn current_user(
    State(state): State<Arc<AppState>>,
) -> Result<Json<User>, (StatusCode, String)> {
    Ok(Json(require_user(&state).await?))
}
