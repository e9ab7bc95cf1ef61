//! Leave Policy Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::LeaveType;

/// Yearly entitlement for one leave type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeavePolicy {
    pub id: i64,
    pub name: String,
    pub leave_type: LeaveType,
    pub days_per_year: i32,
    pub carry_forward: bool,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeavePolicyCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    pub leave_type: LeaveType,
    #[validate(range(min = 0, max = 366, message = "daysPerYear must be 0-366"))]
    pub days_per_year: i32,
    #[serde(default)]
    pub carry_forward: bool,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeavePolicyUpdate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    pub leave_type: Option<LeaveType>,
    #[validate(range(min = 0, max = 366, message = "daysPerYear must be 0-366"))]
    pub days_per_year: Option<i32>,
    pub carry_forward: Option<bool>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}
