//! Organization-wide counters for the HR dashboard

use sqlx::PgPool;

use super::ServiceResult;

/// Headcount per department, including users without one
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentHeadcount {
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub headcount: i64,
}

pub async fn headcount(pool: &PgPool) -> ServiceResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn headcount_by_department(pool: &PgPool) -> ServiceResult<Vec<DepartmentHeadcount>> {
    let rows = sqlx::query_as(
        r#"
        SELECT u.department_id, d.name AS department_name, COUNT(*) AS headcount
        FROM users u
        LEFT JOIN departments d ON d.id = u.department_id
        GROUP BY u.department_id, d.name
        ORDER BY d.name NULLS LAST
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
