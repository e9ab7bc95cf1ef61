//! Department database operations

use shared::error::ErrorCode;
use shared::models::{Department, DepartmentCreate, DepartmentUpdate};
use sqlx::PgPool;

use super::{ServiceResult, now_millis, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const DEPARTMENT_SELECT: &str = r#"
    SELECT d.id, d.name, d.description, d.created_at,
           (SELECT COUNT(*) FROM users u WHERE u.department_id = d.id) AS member_count
    FROM departments d
"#;

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(
        e,
        &[
            ("departments_name_key", ErrorCode::DepartmentNameExists),
            ("users_department_id_fkey", ErrorCode::DepartmentHasMembers),
        ],
    )
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<Department>> {
    let rows = sqlx::query_as(&format!("{DEPARTMENT_SELECT} ORDER BY d.name"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Department>> {
    let row = sqlx::query_as(&format!("{DEPARTMENT_SELECT} WHERE d.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, data: &DepartmentCreate) -> ServiceResult<Department> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO departments (id, name, description, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await
    .map_err(map_write_error)?;

    Ok(Department {
        id,
        name: data.name.trim().to_string(),
        description: data.description.clone(),
        member_count: 0,
        created_at: now,
    })
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &DepartmentUpdate,
) -> ServiceResult<Option<Department>> {
    let rows = sqlx::query(
        r#"
        UPDATE departments SET
            name = COALESCE($1, name),
            description = COALESCE($2, description)
        WHERE id = $3
        "#,
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await
    .map_err(map_write_error)?;

    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

/// Delete a department; fails with `DepartmentHasMembers` while users remain
pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM departments WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(map_write_error)?;
    Ok(rows.rows_affected() > 0)
}
