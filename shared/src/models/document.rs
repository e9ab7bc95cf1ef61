//! Document Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Metadata of a document stored elsewhere and referenced by URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Document {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: String,
    pub url: String,
    /// Size in bytes
    pub size: i64,
    /// User id of the uploader
    pub uploaded_by: i64,
    pub date_uploaded: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCreate {
    pub user_id: i64,
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: String,
    #[validate(url(message = "url must be a valid URL"), length(max = 2048))]
    pub url: String,
    #[validate(range(min = 0, message = "size must not be negative"))]
    pub size: i64,
}
