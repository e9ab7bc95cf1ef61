//! Leave requests: listing and review

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{LeaveRecord, LeaveReview};
use shared::request::LeaveQuery;
use shared::rules::ensure_reviewable;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, Page, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;

/// GET /api/hr/leaves?userId=&department=&status=&startDate=&endDate=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<LeaveQuery>,
) -> ApiResult<Page> {
    let (leaves, total) = db::leaves::list(&state.pool, &query).await?;
    Ok(Json(Page::new("leaves", leaves, query.pagination().paginate(total))?))
}

/// GET /api/hr/leaves/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<LeaveRecord> {
    let leave = found(
        db::leaves::find_record(&state.pool, id).await?,
        ErrorCode::LeaveNotFound,
    )?;
    Ok(Json(leave))
}

/// PATCH /api/hr/leaves/{id}/review `{ status: "approved" | "rejected" }`
pub async fn review(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<LeaveReview>,
) -> ApiResult<LeaveRecord> {
    let current = found(
        db::leaves::find_by_id(&state.pool, id).await?,
        ErrorCode::LeaveNotFound,
    )?;
    ensure_reviewable(current.status, body.status)?;

    // The update only matches pending rows; losing a race to another
    // reviewer leaves nothing to update.
    if db::leaves::review(&state.pool, id, body.status, caller.user_id)
        .await?
        .is_none()
    {
        return Err(AppError::new(ErrorCode::LeaveAlreadyReviewed));
    }

    tracing::info!(
        leave_id = id,
        status = ?body.status,
        reviewer = caller.user_id,
        "Leave reviewed"
    );

    let record = found(
        db::leaves::find_record(&state.pool, id).await?,
        ErrorCode::LeaveNotFound,
    )?;
    Ok(Json(record))
}
