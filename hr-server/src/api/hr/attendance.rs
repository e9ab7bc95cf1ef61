//! Attendance records across the organization

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Attendance, AttendanceCreate, AttendanceUpdate};
use shared::request::AttendanceQuery;
use shared::rules::{AttendanceStats, attendance_stats, ensure_check_out_after};

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, deleted, found};
use crate::db;
use crate::state::AppState;
use crate::util::{month_bounds, today};

/// GET /api/hr/attendance?userId=&department=&status=&startDate=&endDate=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<AttendanceQuery>,
) -> ApiResult<Page> {
    let (records, total) = db::attendance::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "attendance",
        records,
        query.pagination().paginate(total),
    )?))
}

/// POST /api/hr/attendance
///
/// One row per user and day; a second row is `AttendanceExists` (400)
/// whatever its check-in time.
pub async fn create(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<AttendanceCreate>,
) -> CreatedResult<Attendance> {
    ensure_check_out_after(data.check_in, data.check_out)?;

    if !db::users::exists(&state.pool, data.user_id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }
    if db::attendance::find_for_day(&state.pool, data.user_id, data.date)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::AttendanceExists)
            .with_detail("userId", data.user_id)
            .with_detail("date", data.date.to_string()));
    }

    let record = db::attendance::create(&state.pool, &data).await?;
    created(record)
}

/// PUT /api/hr/attendance/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<AttendanceUpdate>,
) -> ApiResult<Attendance> {
    let existing = found(
        db::attendance::find_by_id(&state.pool, id).await?,
        ErrorCode::AttendanceNotFound,
    )?;
    ensure_check_out_after(
        data.check_in.or(existing.check_in),
        data.check_out.or(existing.check_out),
    )?;

    let record = found(
        db::attendance::update(&state.pool, id, &data).await?,
        ErrorCode::AttendanceNotFound,
    )?;
    Ok(Json(record))
}

/// DELETE /api/hr/attendance/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::attendance::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::AttendanceNotFound)
}

/// GET /api/hr/attendance/stats
///
/// Same filters as the list; the range defaults to the current month.
pub async fn stats(
    State(state): State<AppState>,
    ListQuery(mut query): ListQuery<AttendanceQuery>,
) -> ApiResult<AttendanceStats> {
    let (start, end) = query.range().resolve(month_bounds(today(state.workday.timezone)))?;
    query.start_date = Some(start);
    query.end_date = Some(end);

    let records = db::attendance::all_matching(&state.pool, &query).await?;
    Ok(Json(attendance_stats(&records, start, end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::testing;
    use chrono::NaiveDate;
    use shared::models::AttendanceStatus;

    fn entry(user_id: i64, date: NaiveDate, hour: u32) -> AttendanceCreate {
        AttendanceCreate {
            user_id,
            date,
            check_in: Some(date.and_hms_opt(hour, 0, 0).unwrap().and_utc().timestamp_millis()),
            check_out: None,
            status: AttendanceStatus::Present,
            notes: None,
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a local PostgreSQL"]
    async fn test_duplicate_day_rejected_whatever_check_in() {
        let Some(pool) = testing::pool().await else {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return;
        };
        let config = Config::from_lookup(|name| match name {
            "DATABASE_URL" => std::env::var("TEST_DATABASE_URL").ok(),
            _ => None,
        })
        .unwrap();
        let state = AppState::with_pool(pool.clone(), &config);
        let user = testing::employee(&pool).await;
        let day = NaiveDate::from_ymd_opt(2023, 4, 4).unwrap();

        let (status, Json(first)) = create(State(state.clone()), ValidJson(entry(user.id, day, 9)))
            .await
            .unwrap();
        assert_eq!(status, http::StatusCode::CREATED);
        assert_eq!(first.user_id, user.id);

        let err = create(State(state), ValidJson(entry(user.id, day, 14)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AttendanceExists);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert_eq!(err.details.unwrap()["date"], "2023-04-04");
    }
}
