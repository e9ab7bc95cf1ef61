//! User database operations

use shared::error::ErrorCode;
use shared::models::{ProfileUpdate, Role, User, UserCreate, UserSummary, UserUpdate};
use shared::request::UserQuery;
use sqlx::{PgConnection, PgPool};

use super::{ServiceResult, now_millis, page_bounds, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const USER_COLUMNS: &str =
    "id, name, email, role, department_id, position, phone, join_date, created_at, updated_at";

const SUMMARY_SELECT: &str = r#"
    SELECT u.id, u.name, u.email, u.role, u.department_id, d.name AS department_name,
           u.position, u.join_date
    FROM users u
    LEFT JOIN departments d ON d.id = u.department_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::user_role IS NULL OR u.role = $1)
      AND ($2::BIGINT IS NULL OR u.department_id = $2)
      AND ($3::TEXT IS NULL OR u.name ILIKE $3 OR u.email ILIKE $3 OR u.position ILIKE $3)
"#;

/// Login lookup row
#[derive(Debug, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(
        e,
        &[
            ("users_email_key", ErrorCode::EmailExists),
            ("users_department_id_fkey", ErrorCode::DepartmentNotFound),
        ],
    )
}

/// `%term%` with LIKE wildcards escaped
fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_summary(pool: &PgPool, id: i64) -> ServiceResult<Option<UserSummary>> {
    let user = sqlx::query_as(&format!("{SUMMARY_SELECT} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_credentials(pool: &PgPool, email: &str) -> ServiceResult<Option<Credentials>> {
    let row = sqlx::query_as(
        "SELECT id, email, role, password_hash FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn password_hash(pool: &PgPool, id: i64) -> ServiceResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}

pub async fn exists(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn admin_exists(pool: &PgPool) -> ServiceResult<bool> {
    let row: (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await?;
    Ok(row.0)
}

/// Lock the user row for the rest of the transaction
///
/// Serializes writes that must see a consistent view of the user's rows
/// (leave overlap). Returns `false` when the user does not exist.
pub async fn lock(conn: &mut PgConnection, id: i64) -> ServiceResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}

pub async fn list(pool: &PgPool, query: &UserQuery) -> ServiceResult<(Vec<UserSummary>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());
    let search = like_pattern(query.search.as_deref());

    let rows: Vec<UserSummary> = sqlx::query_as(&format!(
        "{SUMMARY_SELECT} {LIST_FILTER} ORDER BY u.name, u.id LIMIT $4 OFFSET $5"
    ))
    .bind(query.role)
    .bind(query.department)
    .bind(&search)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM users u {LIST_FILTER}"))
        .bind(query.role)
        .bind(query.department)
        .bind(&search)
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}

pub async fn department_members(pool: &PgPool, department_id: i64) -> ServiceResult<Vec<UserSummary>> {
    let rows = sqlx::query_as(&format!(
        "{SUMMARY_SELECT} WHERE u.department_id = $1 ORDER BY u.name, u.id"
    ))
    .bind(department_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &PgPool, data: &UserCreate, password_hash: &str) -> ServiceResult<User> {
    let now = now_millis();
    let user = sqlx::query_as(&format!(
        r#"
        INSERT INTO users (
            id, name, email, password_hash, role, department_id,
            position, phone, join_date, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(data.name.trim())
    .bind(data.email.trim().to_lowercase())
    .bind(password_hash)
    .bind(data.role)
    .bind(data.department_id)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(data.join_date)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(user)
}

/// Partial update; `None` fields keep their value
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &UserUpdate,
    password_hash: Option<String>,
) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as(&format!(
        r#"
        UPDATE users SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash),
            role = COALESCE($4, role),
            department_id = COALESCE($5, department_id),
            position = COALESCE($6, position),
            phone = COALESCE($7, phone),
            join_date = COALESCE($8, join_date),
            updated_at = $9
        WHERE id = $10
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.email.as_deref().map(|e| e.trim().to_lowercase()))
    .bind(password_hash)
    .bind(data.role)
    .bind(data.department_id)
    .bind(&data.position)
    .bind(&data.phone)
    .bind(data.join_date)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(user)
}

pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    data: &ProfileUpdate,
    password_hash: Option<String>,
) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as(&format!(
        r#"
        UPDATE users SET
            name = COALESCE($1, name),
            phone = COALESCE($2, phone),
            password_hash = COALESCE($3, password_hash),
            updated_at = $4
        WHERE id = $5
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.phone)
    .bind(password_hash)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
