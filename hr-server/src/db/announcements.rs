//! Announcement operations

use chrono::NaiveDate;
use shared::models::{Announcement, AnnouncementCreate};
use shared::request::AnnouncementQuery;
use sqlx::PgPool;

use super::{ServiceResult, now_millis, page_bounds, snowflake_id};

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, content, date, author, category, is_important, user_id, created_at";

const LIST_FILTER: &str = r#"
    WHERE ($1::TEXT IS NULL OR category = $1)
      AND ($2::BOOLEAN IS NULL OR is_important = $2)
"#;

pub async fn list(
    pool: &PgPool,
    query: &AnnouncementQuery,
) -> ServiceResult<(Vec<Announcement>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());

    let rows: Vec<Announcement> = sqlx::query_as(&format!(
        r#"
        SELECT {ANNOUNCEMENT_COLUMNS} FROM announcements {LIST_FILTER}
        ORDER BY is_important DESC, date DESC, created_at DESC
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(&query.category)
    .bind(query.important)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM announcements {LIST_FILTER}"))
        .bind(&query.category)
        .bind(query.important)
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}

pub async fn create(
    pool: &PgPool,
    data: &AnnouncementCreate,
    date: NaiveDate,
    author: &str,
    user_id: i64,
) -> ServiceResult<Announcement> {
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO announcements (
            id, title, content, date, author, category, is_important, user_id, created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ANNOUNCEMENT_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(data.title.trim())
    .bind(&data.content)
    .bind(date)
    .bind(author)
    .bind(data.category.trim())
    .bind(data.is_important)
    .bind(user_id)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
