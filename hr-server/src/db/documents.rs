//! Document metadata operations

use shared::error::ErrorCode;
use shared::models::{Document, DocumentCreate};
use shared::request::DocumentQuery;
use sqlx::PgPool;

use super::{ServiceResult, now_millis, page_bounds, snowflake_id};
use crate::error::map_constraint;

const DOCUMENT_COLUMNS: &str = "id, user_id, name, category, url, size, uploaded_by, date_uploaded";

const LIST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR user_id = $1)
      AND ($2::TEXT IS NULL OR category = $2)
"#;

pub async fn list(pool: &PgPool, query: &DocumentQuery) -> ServiceResult<(Vec<Document>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());

    let rows: Vec<Document> = sqlx::query_as(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents {LIST_FILTER} ORDER BY date_uploaded DESC LIMIT $3 OFFSET $4"
    ))
    .bind(query.user_id)
    .bind(&query.category)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM documents {LIST_FILTER}"))
        .bind(query.user_id)
        .bind(&query.category)
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}

pub async fn create(pool: &PgPool, data: &DocumentCreate, uploaded_by: i64) -> ServiceResult<Document> {
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO documents (id, user_id, name, category, url, size, uploaded_by, date_uploaded)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {DOCUMENT_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(data.user_id)
    .bind(data.name.trim())
    .bind(data.category.trim())
    .bind(&data.url)
    .bind(data.size)
    .bind(uploaded_by)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| map_constraint(e, &[("documents_user_id_fkey", ErrorCode::UserNotFound)]))?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
