//! Payroll: payslip management
//!
//! Net salary is derived from the stored components on every write.

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{Payslip, PayslipCreate, PayslipStatusUpdate, PayslipUpdate};
use shared::request::PayslipQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, deleted, found};
use crate::db;
use crate::db::payslips::PayslipAmounts;
use crate::state::AppState;

fn period_taken(user_id: i64, amounts: &PayslipAmounts) -> AppError {
    AppError::new(ErrorCode::PayslipExists)
        .with_detail("userId", user_id)
        .with_detail("month", amounts.month)
        .with_detail("year", amounts.year)
}

/// GET /api/hr/payroll?userId=&month=&year=&status=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<PayslipQuery>,
) -> ApiResult<Page> {
    let (payslips, total) = db::payslips::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "payslips",
        payslips,
        query.pagination().paginate(total),
    )?))
}

/// GET /api/hr/payroll/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Payslip> {
    let payslip = found(
        db::payslips::find_by_id(&state.pool, id).await?,
        ErrorCode::PayslipNotFound,
    )?;
    Ok(Json(payslip))
}

/// POST /api/hr/payroll
pub async fn create(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<PayslipCreate>,
) -> CreatedResult<Payslip> {
    let amounts = PayslipAmounts::from(&data);
    amounts.ensure_valid()?;

    if !db::users::exists(&state.pool, data.user_id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }
    if db::payslips::exists_for_period(&state.pool, data.user_id, amounts.month, amounts.year, None)
        .await?
    {
        return Err(period_taken(data.user_id, &amounts));
    }

    let payslip = db::payslips::create(&state.pool, data.user_id, &amounts).await?;
    tracing::info!(
        payslip_id = payslip.id,
        user_id = payslip.user_id,
        month = payslip.month,
        year = payslip.year,
        "Payslip created"
    );
    created(payslip)
}

/// PUT /api/hr/payroll/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<PayslipUpdate>,
) -> ApiResult<Payslip> {
    let existing = found(
        db::payslips::find_by_id(&state.pool, id).await?,
        ErrorCode::PayslipNotFound,
    )?;
    let amounts = PayslipAmounts::from(&existing).with_update(&data);
    amounts.ensure_valid()?;

    if (amounts.month, amounts.year) != (existing.month, existing.year)
        && db::payslips::exists_for_period(
            &state.pool,
            existing.user_id,
            amounts.month,
            amounts.year,
            Some(id),
        )
        .await?
    {
        return Err(period_taken(existing.user_id, &amounts));
    }

    let payslip = found(
        db::payslips::update(&state.pool, id, &amounts).await?,
        ErrorCode::PayslipNotFound,
    )?;
    Ok(Json(payslip))
}

/// PATCH /api/hr/payroll/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<PayslipStatusUpdate>,
) -> ApiResult<Payslip> {
    let payslip = found(
        db::payslips::set_status(&state.pool, id, body.status).await?,
        ErrorCode::PayslipNotFound,
    )?;
    Ok(Json(payslip))
}

/// DELETE /api/hr/payroll/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::payslips::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::PayslipNotFound)
}
