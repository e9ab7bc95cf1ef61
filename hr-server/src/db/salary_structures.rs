//! Salary structure operations

use shared::error::ErrorCode;
use shared::models::{SalaryStructure, SalaryStructureCreate, SalaryStructureUpdate};
use sqlx::PgPool;

use super::{ServiceResult, now_millis, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const STRUCTURE_COLUMNS: &str =
    "id, name, basic_salary, allowances, deductions, description, created_at, updated_at";

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(e, &[("salary_structures_name_key", ErrorCode::SalaryStructureNameExists)])
}

pub async fn list(pool: &PgPool) -> ServiceResult<Vec<SalaryStructure>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {STRUCTURE_COLUMNS} FROM salary_structures ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &SalaryStructureCreate) -> ServiceResult<SalaryStructure> {
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO salary_structures (
            id, name, basic_salary, allowances, deductions, description, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {STRUCTURE_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(data.name.trim())
    .bind(data.basic_salary)
    .bind(data.allowances)
    .bind(data.deductions)
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
    data: &SalaryStructureUpdate,
) -> ServiceResult<Option<SalaryStructure>> {
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE salary_structures SET
            name = COALESCE($1, name),
            basic_salary = COALESCE($2, basic_salary),
            allowances = COALESCE($3, allowances),
            deductions = COALESCE($4, deductions),
            description = COALESCE($5, description),
            updated_at = $6
        WHERE id = $7
        RETURNING {STRUCTURE_COLUMNS}
        "#
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.basic_salary)
    .bind(data.allowances)
    .bind(data.deductions)
    .bind(&data.description)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM salary_structures WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
