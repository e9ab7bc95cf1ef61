//! Authentication endpoints: login, current user, capabilities

use axum::routing::get;
use axum::{Json, Router, extract::State};
use serde::{Deserialize, Serialize};
use shared::access::Capability;
use shared::error::{AppError, ErrorCode};
use shared::models::{Role, User};
use validator::Validate;

use super::extract::ValidJson;
use super::{ApiResult, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct CapabilitiesResponse {
    pub role: Role,
    pub capabilities: Vec<Capability>,
}

pub(super) fn session_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/capabilities", get(capabilities))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let email = req.email.trim().to_lowercase();
    let credentials = db::users::find_credentials(&state.pool, &email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &credentials.password_hash) {
        tracing::warn!(target: "security", email = %email, "login_failed");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .sessions
        .issue(credentials.id, &credentials.email, credentials.role)?;
    let user = found(
        db::users::find_by_id(&state.pool, credentials.id).await?,
        ErrorCode::UserNotFound,
    )?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user,
        expires_in: state.sessions.expiry_hours() * 3600,
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, caller: Caller) -> ApiResult<User> {
    let user = found(
        db::users::find_by_id(&state.pool, caller.user_id).await?,
        ErrorCode::UserNotFound,
    )?;
    Ok(Json(user))
}

/// GET /api/auth/capabilities
pub async fn capabilities(caller: Caller) -> ApiResult<CapabilitiesResponse> {
    Ok(Json(CapabilitiesResponse {
        role: caller.role,
        capabilities: caller.role.capabilities(),
    }))
}
