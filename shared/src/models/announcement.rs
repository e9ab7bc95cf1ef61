//! Announcement Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    /// Display name of the author at publish time
    pub author: String,
    pub category: String,
    pub is_important: bool,
    /// Author's user id
    pub user_id: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementCreate {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000, message = "content must be 1-10000 characters"))]
    pub content: String,
    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: String,
    #[serde(default)]
    pub is_important: bool,
    /// Defaults to today in the business timezone
    pub date: Option<NaiveDate>,
}
