//! Payroll aggregation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::models::Payslip;

/// Largest amount a `NUMERIC(14, 2)` payroll column holds
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

fn out_of_range(field: &str, value: impl ToString) -> AppError {
    AppError::new(ErrorCode::AmountOutOfRange)
        .with_detail("field", field)
        .with_detail("value", value.to_string())
        .with_detail("max", MAX_AMOUNT.to_string())
}

/// `basic + allowances - deductions`, rejected when the result does not fit
/// the `netSalary` column.
pub fn net_salary(
    basic_salary: Decimal,
    allowances: Decimal,
    deductions: Decimal,
) -> Result<Decimal, AppError> {
    let net = basic_salary
        .checked_add(allowances)
        .and_then(|gross| gross.checked_sub(deductions))
        .ok_or_else(|| out_of_range("netSalary", "overflow"))?;
    if net.abs() > MAX_AMOUNT {
        return Err(out_of_range("netSalary", net));
    }
    Ok(net)
}

/// Reject negative salary components and ones too large to store
pub fn ensure_valid_amounts(amounts: &[(&str, Decimal)]) -> Result<(), AppError> {
    for (field, amount) in amounts {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::new(ErrorCode::NegativeAmount)
                .with_detail("field", *field)
                .with_detail("value", amount.to_string()));
        }
        if *amount > MAX_AMOUNT {
            return Err(out_of_range(field, amount));
        }
    }
    Ok(())
}

/// Share of total deductions attributed to tax
pub const TAX_SHARE: Decimal = Decimal::from_parts(40, 0, 0, false, 2);
/// Share of total deductions attributed to insurance
pub const INSURANCE_SHARE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
/// Share of total deductions attributed to pension
pub const PENSION_SHARE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

/// Yearly payslip totals.
///
/// The tax/insurance/pension split is a fixed proportion of total deductions,
/// not a real tax computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    pub payslip_count: usize,
    pub total_earnings: Decimal,
    pub total_deductions: Decimal,
    pub total_net_pay: Decimal,
    pub tax: Decimal,
    pub insurance: Decimal,
    pub pension: Decimal,
}

/// Summarize the payslips that fall in `year`; others are ignored.
pub fn year_summary(payslips: &[Payslip], year: i32) -> YearSummary {
    let in_year = payslips.iter().filter(|p| p.year == year);

    let mut count = 0;
    let mut total_earnings = Decimal::ZERO;
    let mut total_deductions = Decimal::ZERO;
    let mut total_net_pay = Decimal::ZERO;
    for p in in_year {
        count += 1;
        total_earnings += p.basic_salary + p.allowances;
        total_deductions += p.deductions;
        total_net_pay += p.net_salary;
    }

    YearSummary {
        year,
        payslip_count: count,
        total_earnings,
        total_deductions,
        total_net_pay,
        tax: (total_deductions * TAX_SHARE).round_dp(2),
        insurance: (total_deductions * INSURANCE_SHARE).round_dp(2),
        pension: (total_deductions * PENSION_SHARE).round_dp(2),
    }
}
