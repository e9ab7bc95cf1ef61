//! Leave database operations

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{Leave, LeaveCreate, LeaveRecord, LeaveStatus};
use shared::request::LeaveQuery;
use shared::rules::leave::ensure_no_overlap;
use sqlx::{PgConnection, PgPool};

use super::{ServiceResult, now_millis, page_bounds, snowflake_id, users};

const LEAVE_COLUMNS: &str =
    "id, user_id, leave_type, start_date, end_date, reason, status, reviewed_by, reviewed_at, created_at";

const RECORD_SELECT: &str = r#"
    SELECT l.id, l.user_id, l.leave_type, l.start_date, l.end_date, l.reason, l.status,
           l.reviewed_by, l.reviewed_at, l.created_at,
           u.name AS user_name, d.name AS department_name
    FROM leaves l
    JOIN users u ON u.id = l.user_id
    LEFT JOIN departments d ON d.id = u.department_id
"#;

/// Date bounds select leaves that intersect `[startDate, endDate]`
const LIST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR l.user_id = $1)
      AND ($2::BIGINT IS NULL OR u.department_id = $2)
      AND ($3::leave_status IS NULL OR l.status = $3)
      AND ($4::DATE IS NULL OR l.end_date >= $4)
      AND ($5::DATE IS NULL OR l.start_date <= $5)
"#;

pub async fn list(pool: &PgPool, query: &LeaveQuery) -> ServiceResult<(Vec<LeaveRecord>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());

    let rows: Vec<LeaveRecord> = sqlx::query_as(&format!(
        "{RECORD_SELECT} {LIST_FILTER} ORDER BY l.created_at DESC LIMIT $6 OFFSET $7"
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
        "SELECT COUNT(*) FROM leaves l JOIN users u ON u.id = l.user_id {LIST_FILTER}"
    ))
    .bind(query.user_id)
    .bind(query.department)
    .bind(query.status)
    .bind(query.start_date)
    .bind(query.end_date)
    .fetch_one(pool)
    .await?;

    Ok((rows.into_iter().map(LeaveRecord::with_duration).collect(), total.0))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Leave>> {
    let row = sqlx::query_as(&format!("SELECT {LEAVE_COLUMNS} FROM leaves WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_record(pool: &PgPool, id: i64) -> ServiceResult<Option<LeaveRecord>> {
    let row: Option<LeaveRecord> = sqlx::query_as(&format!("{RECORD_SELECT} WHERE l.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(LeaveRecord::with_duration))
}

/// Leaves of a user that intersect `[start, end]`, whatever their status
async fn intersecting(
    conn: &mut PgConnection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> ServiceResult<Vec<Leave>> {
    let rows = sqlx::query_as(&format!(
        r#"
        SELECT {LEAVE_COLUMNS} FROM leaves
        WHERE user_id = $1 AND start_date <= $3 AND end_date >= $2
        ORDER BY start_date
        "#
    ))
    .bind(user_id)
    .bind(start)
    .bind(end)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Create a pending leave request
///
/// The user row is locked for the duration of the transaction so two
/// concurrent requests cannot both pass the overlap check.
pub async fn create(pool: &PgPool, user_id: i64, data: &LeaveCreate) -> ServiceResult<Leave> {
    let mut tx = pool.begin().await?;

    if !users::lock(&mut tx, user_id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }

    let existing = intersecting(&mut tx, user_id, data.start_date, data.end_date).await?;
    ensure_no_overlap(&existing, data.start_date, data.end_date)?;

    let leave = sqlx::query_as(&format!(
        r#"
        INSERT INTO leaves (id, user_id, leave_type, start_date, end_date, reason, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
        RETURNING {LEAVE_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(user_id)
    .bind(data.leave_type)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.reason.trim())
    .bind(now_millis())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(leave)
}

/// Record a review decision; only pending rows are updated
pub async fn review(
    pool: &PgPool,
    id: i64,
    status: LeaveStatus,
    reviewer_id: i64,
) -> ServiceResult<Option<Leave>> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE leaves SET status = $1, reviewed_by = $2, reviewed_at = $3
        WHERE id = $4 AND status = 'pending'
        RETURNING {LEAVE_COLUMNS}
        "#
    ))
    .bind(status)
    .bind(reviewer_id)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Delete a pending request owned by `user_id`
pub async fn cancel(pool: &PgPool, id: i64, user_id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM leaves WHERE id = $1 AND user_id = $2 AND status = 'pending'")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn count_pending(pool: &PgPool) -> ServiceResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM leaves WHERE status = 'pending'")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

/// Users with approved leave covering `date`
pub async fn count_on_leave(pool: &PgPool, date: NaiveDate) -> ServiceResult<i64> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(DISTINCT user_id) FROM leaves
        WHERE status = 'approved' AND start_date <= $1 AND end_date >= $1
        "#,
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
    use shared::models::LeaveType;

    fn request(start: (u32, u32), end: (u32, u32)) -> LeaveCreate {
        LeaveCreate {
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(2023, start.0, start.1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, end.0, end.1).unwrap(),
            reason: "Family trip".into(),
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a local PostgreSQL"]
    async fn test_create_rejects_shared_boundary_day() {
        let Some(pool) = testing::pool().await else {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return;
        };
        let user = testing::employee(&pool).await;

        let first = create(&pool, user.id, &request((4, 10), (4, 15))).await.unwrap();
        assert_eq!(first.status, LeaveStatus::Pending);

        let err: AppError = create(&pool, user.id, &request((4, 15), (4, 18)))
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::LeaveOverlap);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);

        assert!(create(&pool, user.id, &request((4, 16), (4, 18))).await.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and a local PostgreSQL"]
    async fn test_create_for_missing_user() {
        let Some(pool) = testing::pool().await else {
            eprintln!("skipping: TEST_DATABASE_URL not set");
            return;
        };
        let err: AppError = create(&pool, -1, &request((5, 1), (5, 2))).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }
}
