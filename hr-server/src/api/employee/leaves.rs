//! Own leave requests

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{LeaveCreate, LeaveRecord, LeaveStatus};
use shared::request::LeaveQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;

/// GET /api/employee/leaves?status=&startDate=&endDate=
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(mut query): ListQuery<LeaveQuery>,
) -> ApiResult<Page> {
    query.user_id = Some(caller.user_id);
    query.department = None;
    let (leaves, total) = db::leaves::list(&state.pool, &query).await?;
    Ok(Json(Page::new("leaves", leaves, query.pagination().paginate(total))?))
}

/// POST /api/employee/leaves
///
/// Rejected with `LeaveOverlap` (409) when the range touches any existing
/// request of the caller.
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(data): ValidJson<LeaveCreate>,
) -> CreatedResult<LeaveRecord> {
    let leave = db::leaves::create(&state.pool, caller.user_id, &data).await?;
    tracing::info!(
        leave_id = leave.id,
        user_id = caller.user_id,
        start = %leave.start_date,
        end = %leave.end_date,
        "Leave requested"
    );
    let record = found(
        db::leaves::find_record(&state.pool, leave.id).await?,
        ErrorCode::LeaveNotFound,
    )?;
    created(record)
}

/// DELETE /api/employee/leaves/{id}
///
/// Only the owner can cancel, and only while the request is pending.
pub async fn cancel(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let leave = found(
        db::leaves::find_by_id(&state.pool, id).await?,
        ErrorCode::LeaveNotFound,
    )?;
    if leave.user_id != caller.user_id {
        return Err(AppError::new(ErrorCode::NotOwner));
    }
    if leave.status != LeaveStatus::Pending {
        return Err(AppError::new(ErrorCode::LeaveAlreadyReviewed));
    }
    if !db::leaves::cancel(&state.pool, id, caller.user_id).await? {
        return Err(AppError::new(ErrorCode::LeaveAlreadyReviewed));
    }
    Ok(Json(serde_json::json!({ "id": id, "cancelled": true })))
}
