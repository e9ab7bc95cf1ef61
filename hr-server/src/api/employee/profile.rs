//! Own profile and documents

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};
use shared::models::{ProfileUpdate, User};
use shared::request::DocumentQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, Page, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

/// GET /api/employee/profile
pub async fn get(State(state): State<AppState>, caller: Caller) -> ApiResult<User> {
    let user = found(
        db::users::find_by_id(&state.pool, caller.user_id).await?,
        ErrorCode::UserNotFound,
    )?;
    Ok(Json(user))
}

/// PUT /api/employee/profile
///
/// A new password is only accepted together with the current one.
pub async fn update(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(data): ValidJson<ProfileUpdate>,
) -> ApiResult<User> {
    let password_hash = match data.new_password.as_deref() {
        Some(new_password) => {
            let current = data.current_password.as_deref().ok_or_else(|| {
                AppError::validation("Current password is required to set a new one")
                    .with_detail("field", "currentPassword")
            })?;
            let stored = found(
                db::users::password_hash(&state.pool, caller.user_id).await?,
                ErrorCode::UserNotFound,
            )?;
            if !verify_password(current, &stored) {
                tracing::warn!(target: "security", user_id = caller.user_id, "password_change_rejected");
                return Err(AppError::validation("Current password is incorrect")
                    .with_detail("field", "currentPassword"));
            }
            Some(hash_password(new_password).map_err(|e| {
                tracing::error!("Password hashing failed: {e}");
                AppError::new(ErrorCode::InternalError)
            })?)
        }
        None => None,
    };

    let user = found(
        db::users::update_profile(&state.pool, caller.user_id, &data, password_hash).await?,
        ErrorCode::UserNotFound,
    )?;
    Ok(Json(user))
}

/// GET /api/employee/documents?category=
pub async fn documents(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(mut query): ListQuery<DocumentQuery>,
) -> ApiResult<Page> {
    query.user_id = Some(caller.user_id);
    let (documents, total) = db::documents::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "documents",
        documents,
        query.pagination().paginate(total),
    )?))
}
