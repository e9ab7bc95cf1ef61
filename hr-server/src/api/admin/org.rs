//! Organization settings: departments, leave policies, salary structures

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Department, DepartmentCreate, DepartmentUpdate, LeavePolicy, LeavePolicyCreate,
    LeavePolicyUpdate, SalaryStructure, SalaryStructureCreate, SalaryStructureUpdate, UserSummary,
};
use shared::rules::payroll::ensure_valid_amounts;

use crate::api::extract::ValidJson;
use crate::api::{ApiResult, CreatedResult, created, deleted, found};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DepartmentDetail {
    #[serde(flatten)]
    pub department: Department,
    pub members: Vec<UserSummary>,
}

// ── Departments ──

pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    Ok(Json(db::departments::list(&state.pool).await?))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DepartmentDetail> {
    let department = found(
        db::departments::find_by_id(&state.pool, id).await?,
        ErrorCode::DepartmentNotFound,
    )?;
    let members = db::users::department_members(&state.pool, id).await?;
    Ok(Json(DepartmentDetail {
        department,
        members,
    }))
}

pub async fn create_department(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<DepartmentCreate>,
) -> CreatedResult<Department> {
    let department = db::departments::create(&state.pool, &data).await?;
    tracing::info!(department_id = department.id, name = %department.name, "Department created");
    created(department)
}

pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<DepartmentUpdate>,
) -> ApiResult<Department> {
    let department = found(
        db::departments::update(&state.pool, id, &data).await?,
        ErrorCode::DepartmentNotFound,
    )?;
    Ok(Json(department))
}

/// Fails with `DepartmentHasMembers` (409) while users are assigned
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::departments::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::DepartmentNotFound)
}

// ── Leave policies ──

pub async fn list_leave_policies(State(state): State<AppState>) -> ApiResult<Vec<LeavePolicy>> {
    Ok(Json(db::leave_policies::list(&state.pool).await?))
}

pub async fn create_leave_policy(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<LeavePolicyCreate>,
) -> CreatedResult<LeavePolicy> {
    created(db::leave_policies::create(&state.pool, &data).await?)
}

pub async fn update_leave_policy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<LeavePolicyUpdate>,
) -> ApiResult<LeavePolicy> {
    let policy = found(
        db::leave_policies::update(&state.pool, id, &data).await?,
        ErrorCode::LeavePolicyNotFound,
    )?;
    Ok(Json(policy))
}

pub async fn delete_leave_policy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::leave_policies::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::LeavePolicyNotFound)
}

// ── Salary structures ──

fn check_structure_amounts(
    basic_salary: Option<rust_decimal::Decimal>,
    allowances: Option<rust_decimal::Decimal>,
    deductions: Option<rust_decimal::Decimal>,
) -> Result<(), AppError> {
    let amounts: Vec<(&str, rust_decimal::Decimal)> = [
        ("basicSalary", basic_salary),
        ("allowances", allowances),
        ("deductions", deductions),
    ]
    .into_iter()
    .filter_map(|(field, value)| value.map(|v| (field, v)))
    .collect();
    ensure_valid_amounts(&amounts)
}

pub async fn list_salary_structures(
    State(state): State<AppState>,
) -> ApiResult<Vec<SalaryStructure>> {
    Ok(Json(db::salary_structures::list(&state.pool).await?))
}

pub async fn create_salary_structure(
    State(state): State<AppState>,
    ValidJson(data): ValidJson<SalaryStructureCreate>,
) -> CreatedResult<SalaryStructure> {
    check_structure_amounts(
        Some(data.basic_salary),
        Some(data.allowances),
        Some(data.deductions),
    )?;
    created(db::salary_structures::create(&state.pool, &data).await?)
}

pub async fn update_salary_structure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidJson(data): ValidJson<SalaryStructureUpdate>,
) -> ApiResult<SalaryStructure> {
    check_structure_amounts(data.basic_salary, data.allowances, data.deductions)?;
    let structure = found(
        db::salary_structures::update(&state.pool, id, &data).await?,
        ErrorCode::SalaryStructureNotFound,
    )?;
    Ok(Json(structure))
}

pub async fn delete_salary_structure(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::salary_structures::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::SalaryStructureNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_structure_amounts_skip_missing_fields() {
        assert!(check_structure_amounts(None, None, None).is_ok());
        assert!(check_structure_amounts(Some(Decimal::new(300000, 2)), None, Some(Decimal::ZERO)).is_ok());

        let err = check_structure_amounts(None, Some(Decimal::new(-1, 0)), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::NegativeAmount);
        assert_eq!(err.details.as_ref().unwrap()["field"], "allowances");

        let err = check_structure_amounts(Some(Decimal::MAX), None, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AmountOutOfRange);
    }
}
