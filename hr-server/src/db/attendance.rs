//! Attendance database operations
//!
//! One row per (user_id, date), enforced by `attendance_user_date_key`.

use chrono::NaiveDate;
use shared::error::ErrorCode;
use shared::models::{Attendance, AttendanceCreate, AttendanceRecord, AttendanceStatus, AttendanceUpdate};
use shared::request::AttendanceQuery;
use sqlx::PgPool;

use super::{ServiceResult, now_millis, page_bounds, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const ATTENDANCE_COLUMNS: &str =
    "id, user_id, date, check_in, check_out, status, notes, created_at, updated_at";

const RECORD_SELECT: &str = r#"
    SELECT a.id, a.user_id, a.date, a.check_in, a.check_out, a.status, a.notes,
           a.created_at, a.updated_at,
           u.name AS user_name, d.name AS department_name
    FROM attendance a
    JOIN users u ON u.id = a.user_id
    LEFT JOIN departments d ON d.id = u.department_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR a.user_id = $1)
      AND ($2::BIGINT IS NULL OR u.department_id = $2)
      AND ($3::attendance_status IS NULL OR a.status = $3)
      AND ($4::DATE IS NULL OR a.date >= $4)
      AND ($5::DATE IS NULL OR a.date <= $5)
"#;

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(
        e,
        &[
            ("attendance_user_date_key", ErrorCode::AttendanceExists),
            ("attendance_user_id_fkey", ErrorCode::UserNotFound),
            ("attendance_check_out_after_check_in", ErrorCode::CheckOutBeforeCheckIn),
        ],
    )
}

pub async fn list(
    pool: &PgPool,
    query: &AttendanceQuery,
) -> ServiceResult<(Vec<AttendanceRecord>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());

    let rows: Vec<AttendanceRecord> = sqlx::query_as(&format!(
        "{RECORD_SELECT} {LIST_FILTER} ORDER BY a.date DESC, u.name LIMIT $6 OFFSET $7"
    ))
    .bind(query.user_id)
    .bind(query.department)
    .bind(query.status)
    .bind(query.start_date)
    .bind(query.end_date)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!(
        "SELECT COUNT(*) FROM attendance a JOIN users u ON u.id = a.user_id {LIST_FILTER}"
    ))
    .bind(query.user_id)
    .bind(query.department)
    .bind(query.status)
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_one(pool)
    .await?;

    Ok((rows, total.0))
}

/// Every row of one user in `[start, end]`, for aggregation
pub async fn for_user_in_range(
    pool: &PgPool,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<Attendance>> {
    let rows = sqlx::query_as(&format!(
        r#"
        SELECT {ATTENDANCE_COLUMNS} FROM attendance
        WHERE user_id = $1 AND date >= $2 AND date <= $3
        ORDER BY date
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every row of a department's members in `[start, end]`
pub async fn for_department_in_range(
    pool: &PgPool,
    department_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<AttendanceRecord>> {
    let rows = sqlx::query_as(&format!(
        r#"
        {RECORD_SELECT}
        WHERE u.department_id = $1 AND a.date >= $2 AND a.date <= $3
        ORDER BY a.date DESC, u.name
        "#
    ))
    .bind(department_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Rows matching the HR filter without pagination, for stats
pub async fn all_matching(pool: &PgPool, query: &AttendanceQuery) -> ServiceResult<Vec<Attendance>> {
    let rows = sqlx::query_as(&format!(
        r#"
        SELECT a.id, a.user_id, a.date, a.check_in, a.check_out, a.status, a.notes,
               a.created_at, a.updated_at
        FROM attendance a JOIN users u ON u.id = a.user_id
        {LIST_FILTER}
        "#
    ))
    .bind(query.user_id)
    .bind(query.department)
    .bind(query.status)
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Attendance>> {
    let row = sqlx::query_as(&format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_for_day(
    pool: &PgPool,
    user_id: i64,
    date: NaiveDate,
) -> ServiceResult<Option<Attendance>> {
    let row = sqlx::query_as(&format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE user_id = $1 AND date = $2"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &AttendanceCreate) -> ServiceResult<Attendance> {
    insert(
        pool,
        data.user_id,
        data.date,
        data.check_in,
        data.check_out,
        data.status,
        data.notes.as_deref(),
    )
    .await
}

/// Insert a row; a second row for the same user and day fails with `AttendanceExists`
pub async fn insert(
    pool: &PgPool,
    user_id: i64,
    date: NaiveDate,
    check_in: Option<i64>,
    check_out: Option<i64>,
    status: AttendanceStatus,
    notes: Option<&str>,
) -> ServiceResult<Attendance> {
    let now = now_millis();
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO attendance (
            id, user_id, date, check_in, check_out, status, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {ATTENDANCE_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(user_id)
    .bind(date)
    .bind(check_in)
    .bind(check_out)
    .bind(status)
    .bind(notes)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &AttendanceUpdate,
) -> ServiceResult<Option<Attendance>> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE attendance SET
            check_in = COALESCE($1, check_in),
            check_out = COALESCE($2, check_out),
            status = COALESCE($3, status),
            notes = COALESCE($4, notes),
            updated_at = $5
        WHERE id = $6
        RETURNING {ATTENDANCE_COLUMNS}
        "#
    ))
    .bind(data.check_in)
    .bind(data.check_out)
    .bind(data.status)
    .bind(&data.notes)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

/// Set check-out once; returns `None` when it was already set
pub async fn check_out(
    pool: &PgPool,
    id: i64,
    at: i64,
    notes: Option<&str>,
) -> ServiceResult<Option<Attendance>> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE attendance SET
            check_out = $1,
            notes = COALESCE($2, notes),
            updated_at = $1
        WHERE id = $3 AND check_out IS NULL
        RETURNING {ATTENDANCE_COLUMNS}
        "#
    ))
    .bind(at)
    .bind(notes)
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM attendance WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Users with a present/late/work-from-home/half-day row on `date`
pub async fn count_present_on(pool: &PgPool, date: NaiveDate) -> ServiceResult<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM attendance WHERE date = $1 AND status <> 'absent'",
    )
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use shared::error::AppError;

    fn at(date: NaiveDate, h: u32) -> i64 {
        date.and_hms_opt(h, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a local PostgreSQL"]
    async fn test_second_row_for_same_day_rejected() {
        let Some(pool) = testing::pool().await else {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return;
        };
        let user = testing::employee(&pool).await;
        let day = NaiveDate::from_ymd_opt(2023, 4, 3).unwrap();

        insert(&pool, user.id, day, Some(at(day, 9)), None, AttendanceStatus::Present, None)
            .await
            .unwrap();

        // different check-in time, same user and day
        let err: AppError = insert(&pool, user.id, day, Some(at(day, 11)), None, AttendanceStatus::Late, None)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::AttendanceExists);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let next_day = day.succ_opt().unwrap();
        assert!(
            insert(&pool, user.id, next_day, Some(at(next_day, 9)), None, AttendanceStatus::Present, None)
                .await
                .is_ok()
        );
    }
}
