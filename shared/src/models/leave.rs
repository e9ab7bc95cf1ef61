//! Leave Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::rules::leave::leave_duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "leave_type", rename_all = "kebab-case"))]
pub enum LeaveType {
    Annual,
    Sick,
    Casual,
    Maternity,
    Paternity,
    Unpaid,
    Other,
}

/// Leave lifecycle: `pending -> approved | rejected`, one way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "leave_status", rename_all = "kebab-case"))]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Leave {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
}

/// Leave row joined with the requester, plus its inclusive duration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LeaveRecord {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub leave: Leave,
    pub user_name: String,
    pub department_name: Option<String>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub days: i64,
}

impl LeaveRecord {
    /// Fill in `days` from the date range
    pub fn with_duration(mut self) -> Self {
        self.days = leave_duration(self.leave.start_date, self.leave.end_date);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeaveCreate {
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, max = 500, message = "reason must be 1-500 characters"))]
    pub reason: String,
}

/// HR / team-lead decision on a pending request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeaveReview {
    pub status: LeaveStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_field_is_named_type() {
        let json = r#"{"type":"sick","startDate":"2023-04-15","endDate":"2023-04-20","reason":"flu"}"#;
        let req: LeaveCreate = serde_json::from_str(json).unwrap();
        assert_eq!(req.leave_type, LeaveType::Sick);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_reason_rejected() {
        let req = LeaveCreate {
            leave_type: LeaveType::Annual,
            start_date: NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            reason: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_record_duration() {
        let record = LeaveRecord {
            leave: Leave {
                id: 1,
                user_id: 1,
                leave_type: LeaveType::Annual,
                start_date: NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2023, 4, 20).unwrap(),
                reason: "trip".into(),
                status: LeaveStatus::Pending,
                reviewed_by: None,
                reviewed_at: None,
                created_at: 0,
            },
            user_name: "Ada".into(),
            department_name: None,
            days: 0,
        }
        .with_duration();
        assert_eq!(record.days, 6);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["days"], 6);
        assert_eq!(json["type"], "annual");
        assert_eq!(json["status"], "pending");
    }
}
