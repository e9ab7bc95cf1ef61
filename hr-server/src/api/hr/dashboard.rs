//! HR dashboard counters

use axum::Json;
use axum::extract::State;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::ApiResult;
use crate::db;
use crate::db::dashboard::DepartmentHeadcount;
use crate::state::AppState;
use crate::util::today;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub headcount: i64,
    pub departments: Vec<DepartmentHeadcount>,
    pub present_today: i64,
    pub on_leave_today: i64,
    pub pending_leaves: i64,
    pub payroll: PayrollTotals,
}

/// Payslip totals for the current month
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollTotals {
    pub month: u32,
    pub year: i32,
    pub payslip_count: usize,
    pub total_gross: Decimal,
    pub total_deductions: Decimal,
    pub total_net: Decimal,
}

/// GET /api/hr/dashboard
pub async fn summary(State(state): State<AppState>) -> ApiResult<DashboardSummary> {
    let date = today(state.workday.timezone);
    let pool = &state.pool;

    let (headcount, departments, present_today, on_leave_today, pending_leaves, payslips) = tokio::try_join!(
        db::dashboard::headcount(pool),
        db::dashboard::headcount_by_department(pool),
        db::attendance::count_present_on(pool, date),
        db::leaves::count_on_leave(pool, date),
        db::leaves::count_pending(pool),
        db::payslips::for_period(pool, date.month() as i32, date.year()),
    )?;

    let payroll = payslips.iter().fold(
        PayrollTotals {
            month: date.month(),
            year: date.year(),
            ..Default::default()
        },
        |mut acc, p| {
            acc.payslip_count += 1;
            acc.total_gross += p.basic_salary + p.allowances;
            acc.total_deductions += p.deductions;
            acc.total_net += p.net_salary;
            acc
        },
    );

    Ok(Json(DashboardSummary {
        date,
        headcount,
        departments,
        present_today,
        on_leave_today,
        pending_leaves,
        payroll,
    }))
}
