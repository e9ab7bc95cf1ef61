//! Payslip Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payslip_status", rename_all = "kebab-case"))]
pub enum PayslipStatus {
    #[default]
    Pending,
    Approved,
    Paid,
}

/// Monthly payslip; one per (user_id, month, year)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payslip {
    pub id: i64,
    pub user_id: i64,
    pub month: i32,
    pub year: i32,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    /// Always `basic_salary + allowances - deductions`
    pub net_salary: Decimal,
    pub status: PayslipStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PayslipRecord {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub payslip: Payslip,
    pub user_name: String,
    pub department_name: Option<String>,
}

/// Create payslip payload
///
/// `net_salary` is accepted for compatibility with existing clients but is
/// never trusted; the server recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PayslipCreate {
    pub user_id: i64,
    #[validate(range(min = 1, max = 12, message = "month must be 1-12"))]
    pub month: i32,
    #[validate(range(min = 2000, max = 2100, message = "year must be 2000-2100"))]
    pub year: i32,
    pub basic_salary: Decimal,
    #[serde(default)]
    pub allowances: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
    pub net_salary: Option<Decimal>,
    pub status: Option<PayslipStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PayslipUpdate {
    #[validate(range(min = 1, max = 12, message = "month must be 1-12"))]
    pub month: Option<i32>,
    #[validate(range(min = 2000, max = 2100, message = "year must be 2000-2100"))]
    pub year: Option<i32>,
    pub basic_salary: Option<Decimal>,
    pub allowances: Option<Decimal>,
    pub deductions: Option<Decimal>,
    /// Ignored, see [`PayslipCreate`]
    pub net_salary: Option<Decimal>,
    pub status: Option<PayslipStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PayslipStatusUpdate {
    pub status: PayslipStatus,
}
