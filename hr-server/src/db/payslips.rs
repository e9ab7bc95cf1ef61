//! Payslip database operations
//!
//! `net_salary` is always written from [`shared::rules::payroll::net_salary`];
//! a client-supplied value never reaches the database.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Payslip, PayslipCreate, PayslipRecord, PayslipStatus, PayslipUpdate};
use shared::request::PayslipQuery;
use shared::rules::payroll::{ensure_valid_amounts, net_salary};
use sqlx::PgPool;

use super::{ServiceResult, now_millis, page_bounds, snowflake_id};
use crate::error::{ServiceError, map_constraint};

const PAYSLIP_COLUMNS: &str = "id, user_id, month, year, basic_salary, allowances, deductions, \
                               net_salary, status, created_at, updated_at";

const RECORD_SELECT: &str = r#"
    SELECT p.id, p.user_id, p.month, p.year, p.basic_salary, p.allowances, p.deductions,
           p.net_salary, p.status, p.created_at, p.updated_at,
           u.name AS user_name, d.name AS department_name
    FROM payslips p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN departments d ON d.id = u.department_id
"#;

const LIST_FILTER: &str = r#"
    WHERE ($1::BIGINT IS NULL OR p.user_id = $1)
      AND ($2::INTEGER IS NULL OR p.month = $2)
      AND ($3::INTEGER IS NULL OR p.year = $3)
      AND ($4::payslip_status IS NULL OR p.status = $4)
"#;

fn map_write_error(e: sqlx::Error) -> ServiceError {
    map_constraint(
        e,
        &[
            ("payslips_user_period_key", ErrorCode::PayslipExists),
            ("payslips_user_id_fkey", ErrorCode::UserNotFound),
        ],
    )
}

/// Final amounts of a create or update, with net salary derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayslipAmounts {
    pub month: i32,
    pub year: i32,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub status: PayslipStatus,
}

impl PayslipAmounts {
    pub fn net_salary(&self) -> Result<Decimal, AppError> {
        net_salary(self.basic_salary, self.allowances, self.deductions)
    }

    /// Apply a partial update over stored amounts
    pub fn with_update(self, update: &PayslipUpdate) -> Self {
        Self {
            month: update.month.unwrap_or(self.month),
            year: update.year.unwrap_or(self.year),
            basic_salary: update.basic_salary.unwrap_or(self.basic_salary),
            allowances: update.allowances.unwrap_or(self.allowances),
            deductions: update.deductions.unwrap_or(self.deductions),
            status: update.status.unwrap_or(self.status),
        }
    }

    /// Components must be storable and so must the derived net salary
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        ensure_valid_amounts(&[
            ("basicSalary", self.basic_salary),
            ("allowances", self.allowances),
            ("deductions", self.deductions),
        ])?;
        self.net_salary().map(|_| ())
    }
}

impl From<&PayslipCreate> for PayslipAmounts {
    fn from(data: &PayslipCreate) -> Self {
        Self {
            month: data.month,
            year: data.year,
            basic_salary: data.basic_salary,
            allowances: data.allowances,
            deductions: data.deductions,
            status: data.status.unwrap_or_default(),
        }
    }
}

impl From<&Payslip> for PayslipAmounts {
    fn from(p: &Payslip) -> Self {
        Self {
            month: p.month,
            year: p.year,
            basic_salary: p.basic_salary,
            allowances: p.allowances,
            deductions: p.deductions,
            status: p.status,
        }
    }
}

pub async fn list(pool: &PgPool, query: &PayslipQuery) -> ServiceResult<(Vec<PayslipRecord>, i64)> {
    let (limit, offset) = page_bounds(&query.pagination());

    let rows: Vec<PayslipRecord> = sqlx::query_as(&format!(
        "{RECORD_SELECT} {LIST_FILTER} ORDER BY p.year DESC, p.month DESC, u.name LIMIT $5 OFFSET $6"
    ))
    .bind(query.user_id)
    .bind(query.month)
    .bind(query.year)
    .bind(query.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM payslips p {LIST_FILTER}"))
        .bind(query.user_id)
        .bind(query.month)
        .bind(query.year)
        .bind(query.status)
        .fetch_one(pool)
        .await?;

    Ok((rows, total.0))
}

pub async fn for_user(pool: &PgPool, user_id: i64, year: Option<i32>) -> ServiceResult<Vec<Payslip>> {
    let rows = sqlx::query_as(&format!(
        r#"
        SELECT {PAYSLIP_COLUMNS} FROM payslips
        WHERE user_id = $1 AND ($2::INTEGER IS NULL OR year = $2)
        ORDER BY year DESC, month DESC
        "#
    ))
    .bind(user_id)
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn for_period(pool: &PgPool, month: i32, year: i32) -> ServiceResult<Vec<Payslip>> {
    let rows = sqlx::query_as(&format!(
        "SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE month = $1 AND year = $2"
    ))
    .bind(month)
    .bind(year)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> ServiceResult<Option<Payslip>> {
    let row = sqlx::query_as(&format!("SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn exists_for_period(
    pool: &PgPool,
    user_id: i64,
    month: i32,
    year: i32,
    exclude_id: Option<i64>,
) -> ServiceResult<bool> {
    let row: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM payslips
            WHERE user_id = $1 AND month = $2 AND year = $3
              AND ($4::BIGINT IS NULL OR id <> $4)
        )
        "#,
    )
    .bind(user_id)
    .bind(month)
    .bind(year)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

pub async fn create(pool: &PgPool, user_id: i64, amounts: &PayslipAmounts) -> ServiceResult<Payslip> {
    let net = amounts.net_salary()?;
    let now = now_millis();
    let row = sqlx::query_as(&format!(
        r#"
        INSERT INTO payslips (
            id, user_id, month, year, basic_salary, allowances, deductions,
            net_salary, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {PAYSLIP_COLUMNS}
        "#
    ))
    .bind(snowflake_id())
    .bind(user_id)
    .bind(amounts.month)
    .bind(amounts.year)
    .bind(amounts.basic_salary)
    .bind(amounts.allowances)
    .bind(amounts.deductions)
    .bind(net)
    .bind(amounts.status)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

/// Overwrite amounts and status, recomputing net salary
pub async fn update(pool: &PgPool, id: i64, amounts: &PayslipAmounts) -> ServiceResult<Option<Payslip>> {
    let net = amounts.net_salary()?;
    let row = sqlx::query_as(&format!(
        r#"
        UPDATE payslips SET
            month = $1, year = $2,
            basic_salary = $3, allowances = $4, deductions = $5, net_salary = $6,
            status = $7, updated_at = $8
        WHERE id = $9
        RETURNING {PAYSLIP_COLUMNS}
        "#
    ))
    .bind(amounts.month)
    .bind(amounts.year)
    .bind(amounts.basic_salary)
    .bind(amounts.allowances)
    .bind(amounts.deductions)
    .bind(net)
    .bind(amounts.status)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

pub async fn set_status(pool: &PgPool, id: i64, status: PayslipStatus) -> ServiceResult<Option<Payslip>> {
    let row = sqlx::query_as(&format!(
        "UPDATE payslips SET status = $1, updated_at = $2 WHERE id = $3 RETURNING {PAYSLIP_COLUMNS}"
    ))
    .bind(status)
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM payslips WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
