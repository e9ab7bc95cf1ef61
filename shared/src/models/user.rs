//! User Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Role;

/// User record (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User joined with its department name, used by list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department_id: Option<i64>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    pub role: Role,
    pub department_id: Option<i64>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// Update user payload (admin)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    pub department_id: Option<i64>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    pub join_date: Option<NaiveDate>,
}

/// Self-service profile update
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub phone: Option<String>,
    /// Required when `new_password` is present
    pub current_password: Option<String>,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub new_password: Option<String>,
}
