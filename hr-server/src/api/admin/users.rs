//! User account management

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserCreate, UserSummary, UserUpdate};
use shared::request::UserQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, deleted, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;
use crate::util::hash_password;

fn hash(password: &str) -> Result<String, AppError> {
    hash_password(password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}

/// GET /api/admin/users
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<UserQuery>,
) -> ApiResult<Page> {
    let (users, total) = db::users::list(&state.pool, &query).await?;
    Ok(Json(Page::new("users", users, query.pagination().paginate(total))?))
}

/// GET /api/admin/users/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<UserSummary> {
    let user = found(
        db::users::find_summary(&state.pool, id).await?,
        ErrorCode::UserNotFound,
    )?;
    Ok(Json(user))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(data): ValidJson<UserCreate>,
) -> CreatedResult<User> {
    let password_hash = hash(&data.password)?;
    let user = db::users::create(&state.pool, &data, &password_hash).await?;
    tracing::info!(user_id = user.id, role = %user.role, by = caller.user_id, "User created");
    created(user)
}

/// PUT /api/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<UserUpdate>,
) -> ApiResult<User> {
    let password_hash = data.password.as_deref().map(hash).transpose()?;
    let user = found(
        db::users::update(&state.pool, id, &data, password_hash).await?,
        ErrorCode::UserNotFound,
    )?;
    tracing::info!(user_id = id, by = caller.user_id, "User updated");
    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    if id == caller.user_id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    let removed = db::users::delete(&state.pool, id).await?;
    if removed {
        tracing::info!(user_id = id, by = caller.user_id, "User deleted");
    }
    deleted(id, removed, ErrorCode::UserNotFound)
}
