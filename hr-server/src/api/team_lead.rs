//! Team lead routes (`team:workspace`)
//!
//! The team is the caller's department. A caller without a department has
//! an empty team.

use std::collections::HashMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router, middleware};
use chrono::NaiveDate;
use serde::Serialize;
use shared::access::Capability;
use shared::error::{AppError, ErrorCode};
use shared::models::{Attendance, AttendanceRecord, UserSummary};
use shared::request::{DateRangeQuery, LeaveQuery, Pagination};
use shared::rules::{AttendanceStats, attendance_stats};

use super::extract::ListQuery;
use super::{ApiResult, Page, found};
use crate::auth::{Caller, require};
use crate::db;
use crate::state::AppState;
use crate::util::{month_bounds, today};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/members", get(members))
        .route("/attendance", get(attendance))
        .route("/leaves", get(leaves))
        .layer(middleware::from_fn(require(Capability::TeamWorkspace)))
}

async fn team_of(state: &AppState, caller: &Caller) -> Result<Option<i64>, AppError> {
    let user = found(
        db::users::find_by_id(&state.pool, caller.user_id).await?,
        ErrorCode::UserNotFound,
    )?;
    Ok(user.department_id)
}

/// GET /api/team-lead/members
pub async fn members(State(state): State<AppState>, caller: Caller) -> ApiResult<Vec<UserSummary>> {
    let Some(department_id) = team_of(&state, &caller).await? else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(db::users::department_members(&state.pool, department_id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberAttendance {
    pub user: UserSummary,
    pub stats: AttendanceStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAttendance {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub team: AttendanceStats,
    pub members: Vec<MemberAttendance>,
    pub records: Vec<AttendanceRecord>,
}

/// Per-member stats; members without rows still get an entry
fn member_stats(
    members: Vec<UserSummary>,
    records: &[AttendanceRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<MemberAttendance> {
    let mut by_user: HashMap<i64, Vec<Attendance>> = HashMap::new();
    for r in records {
        by_user
            .entry(r.attendance.user_id)
            .or_default()
            .push(r.attendance.clone());
    }
    members
        .into_iter()
        .map(|user| {
            let rows = by_user.remove(&user.id).unwrap_or_default();
            MemberAttendance {
                stats: attendance_stats(&rows, start, end),
                user,
            }
        })
        .collect()
}

/// GET /api/team-lead/attendance?startDate=&endDate=
///
/// The range defaults to the current month.
pub async fn attendance(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(range): ListQuery<DateRangeQuery>,
) -> ApiResult<TeamAttendance> {
    let (start, end) = range.resolve(month_bounds(today(state.workday.timezone)))?;

    let (members, records) = match team_of(&state, &caller).await? {
        Some(department_id) => (
            db::users::department_members(&state.pool, department_id).await?,
            db::attendance::for_department_in_range(&state.pool, department_id, start, end)
                .await?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    let all: Vec<Attendance> = records.iter().map(|r| r.attendance.clone()).collect();
    Ok(Json(TeamAttendance {
        start_date: start,
        end_date: end,
        team: attendance_stats(&all, start, end),
        members: member_stats(members, &records, start, end),
        records,
    }))
}

/// GET /api/team-lead/leaves?status=&startDate=&endDate=
pub async fn leaves(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(mut query): ListQuery<LeaveQuery>,
) -> ApiResult<Page> {
    let pagination = query.pagination();
    let Some(department_id) = team_of(&state, &caller).await? else {
        return Ok(Json(Page::new(
            "leaves",
            Vec::<()>::new(),
            Pagination::new(0, pagination.page(), pagination.limit()),
        )?));
    };
    query.department = Some(department_id);
    let (leaves, total) = db::leaves::list(&state.pool, &query).await?;
    Ok(Json(Page::new("leaves", leaves, pagination.paginate(total))?))
}
