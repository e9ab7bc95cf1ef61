//! Own attendance: history, check-in, check-out

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};
use shared::models::{Attendance, AttendanceStatus, CheckIn, CheckOut};
use shared::request::AttendanceQuery;
use shared::rules::{attendance_stats, check_in_status};
use shared::util::now_millis;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created};
use crate::auth::Caller;
use crate::db;
use crate::state::{AppState, Workday};
use crate::util::{local_date, local_time, month_bounds, today};

/// GET /api/employee/attendance?status=&startDate=&endDate=
///
/// Rows are paginated; `stats` covers the requested range (current month
/// when a bound is missing).
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(mut query): ListQuery<AttendanceQuery>,
) -> ApiResult<Page> {
    query.user_id = Some(caller.user_id);
    query.department = None;

    let (start, end) = query.range().resolve(month_bounds(today(state.workday.timezone)))?;

    let (records, total) = db::attendance::list(&state.pool, &query).await?;
    let in_range = db::attendance::for_user_in_range(&state.pool, caller.user_id, start, end).await?;

    let page = Page::new("attendance", records, query.pagination().paginate(total))?
        .with("stats", attendance_stats(&in_range, start, end))?;
    Ok(Json(page))
}

/// Status recorded for a check-in at `millis`
fn arrival_status(workday: &Workday, millis: i64, work_from_home: bool) -> AttendanceStatus {
    if work_from_home {
        return AttendanceStatus::WorkFromHome;
    }
    check_in_status(
        local_time(millis, workday.timezone),
        workday.start,
        workday.late_grace_minutes,
    )
}

/// POST /api/employee/attendance/check-in
pub async fn check_in(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(body): ValidJson<CheckIn>,
) -> CreatedResult<Attendance> {
    let now = now_millis();
    let date = local_date(now, state.workday.timezone);

    if db::attendance::find_for_day(&state.pool, caller.user_id, date)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AttendanceExists).with_detail("date", date.to_string()));
    }

    let status = arrival_status(&state.workday, now, body.work_from_home.unwrap_or(false));
    let record = db::attendance::insert(
        &state.pool,
        caller.user_id,
        date,
        Some(now),
        None,
        status,
        body.notes.as_deref(),
    )
    .await?;

    tracing::info!(user_id = caller.user_id, %date, status = ?status, "Checked in");
    created(record)
}

/// POST /api/employee/attendance/check-out
pub async fn check_out(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(body): ValidJson<CheckOut>,
) -> ApiResult<Attendance> {
    let date = today(state.workday.timezone);
    let record = db::attendance::find_for_day(&state.pool, caller.user_id, date)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::AttendanceNotFound, "Not checked in today")
        })?;

    if record.check_out.is_some() {
        return Err(AppError::new(ErrorCode::AlreadyCheckedOut));
    }

    let updated = db::attendance::check_out(&state.pool, record.id, now_millis(), body.notes.as_deref())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AlreadyCheckedOut))?;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use chrono_tz::Tz;

    fn workday(tz: Tz) -> Workday {
        Workday {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            late_grace_minutes: 15,
            timezone: tz,
        }
    }

    fn at(tz: Tz, h: u32, m: u32) -> i64 {
        let local = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap();
        tz.from_local_datetime(&local).unwrap().timestamp_millis()
    }

    #[test]
    fn test_arrival_uses_business_timezone() {
        let tz: Tz = "Europe/Madrid".parse().unwrap();
        let wd = workday(tz);
        assert_eq!(arrival_status(&wd, at(tz, 9, 10), false), AttendanceStatus::Present);
        assert_eq!(arrival_status(&wd, at(tz, 9, 16), false), AttendanceStatus::Late);
        // 09:10 UTC is 11:10 in Madrid during summer time
        assert_eq!(
            arrival_status(&wd, at(Tz::UTC, 9, 10), false),
            AttendanceStatus::Late
        );
    }

    #[test]
    fn test_work_from_home_overrides_lateness() {
        let wd = workday(Tz::UTC);
        assert_eq!(
            arrival_status(&wd, at(Tz::UTC, 11, 0), true),
            AttendanceStatus::WorkFromHome
        );
    }
}
