//! Leave policy operations

use shared::error::ErrorCode;
use shared::models::{LeavePolicy, LeavePolicyCreate, LeavePolicyUpdate};
use sqlx::PgPool;

use super::{ServiceResult, now_millis, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const POLICY_COLUMNS: &str =
    "id, name, leave_type, days_per_year, carry_forward, description, created_at, updated_at";

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(e, &[("leave_policies_name_key", ErrorCode::LeavePolicyNameExists)])
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<LeavePolicy>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {POLICY_COLUMNS} FROM leave_policies ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &LeavePolicyCreate) -> ServiceResult<LeavePolicy> {
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO leave_policies (
            id, name, leave_type, days_per_year, carry_forward, description, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {POLICY_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(data.name.trim())
    .bind(data.leave_type)
    .bind(data.days_per_year)
    .bind(data.carry_forward)
    .bind(&data.description)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &LeavePolicyUpdate,
) -> ServiceResult<Option<LeavePolicy>> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE leave_policies SET
            name = COALESCE($1, name),
            leave_type = COALESCE($2, leave_type),
            days_per_year = COALESCE($3, days_per_year),
            carry_forward = COALESCE($4, carry_forward),
            description = COALESCE($5, description),
            updated_at = $6
        WHERE id = $7
        RETURNING {POLICY_COLUMNS}
        "#
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.leave_type)
    .bind(data.days_per_year)
    .bind(data.carry_forward)
    .bind(&data.description)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM leave_policies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
