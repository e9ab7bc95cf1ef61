//! Employee directory

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::UserSummary;
use shared::request::UserQuery;
use shared::rules::{AttendanceStats, attendance_stats};

use crate::api::extract::ListQuery;
use crate::api::{ApiResult, Page, found};
use crate::db;
use crate::state::AppState;
use crate::util::{month_bounds, today};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub user: UserSummary,
    /// Attendance for the current calendar month
    pub attendance: AttendanceStats,
}

/// GET /api/hr/employees?department=&search=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<UserQuery>,
) -> ApiResult<Page> {
    let (employees, total) = db::users::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "employees",
        employees,
        query.pagination().paginate(total),
    )?))
}

/// GET /api/hr/employees/{id}
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<EmployeeDetail> {
    let user = found(
        db::users::find_summary(&state.pool, id).await?,
        ErrorCode::UserNotFound,
    )?;
    let (start, end) = month_bounds(today(state.workday.timezone));
    let records = db::attendance::for_user_in_range(&state.pool, id, start, end).await?;

    Ok(Json(EmployeeDetail {
        user,
        attendance: attendance_stats(&records, start, end),
    }))
}
