//! Own payslips

use axum::Json;
use axum::extract::State;
use chrono::Datelike;
use shared::models::Payslip;
use shared::request::YearQuery;
use shared::rules::{YearSummary, year_summary};

use crate::api::ApiResult;
use crate::api::extract::ListQuery;
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;
use crate::util::today;

/// GET /api/employee/payslips?year=
pub async fn list(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(query): ListQuery<YearQuery>,
) -> ApiResult<Vec<Payslip>> {
    let payslips = db::payslips::for_user(&state.pool, caller.user_id, query.year).await?;
    Ok(Json(payslips))
}

/// GET /api/employee/payslips/summary?year=
///
/// Defaults to the current year.
pub async fn summary(
    State(state): State<AppState>,
    caller: Caller,
    ListQuery(query): ListQuery<YearQuery>,
) -> ApiResult<YearSummary> {
    let year = query
        .year
        .unwrap_or_else(|| today(state.workday.timezone).year());
    let payslips = db::payslips::for_user(&state.pool, caller.user_id, Some(year)).await?;
    Ok(Json(year_summary(&payslips, year)))
}
