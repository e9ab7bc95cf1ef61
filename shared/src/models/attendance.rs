//! Attendance Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Attendance status for one user-day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "attendance_status", rename_all = "kebab-case")
)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    WorkFromHome,
}

/// One attendance row; at most one per (user_id, date)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    /// Check-in instant (Unix millis)
    pub check_in: Option<i64>,
    /// Check-out instant (Unix millis), never earlier than `check_in`
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Attendance joined with the owner's name and department, for HR/team views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AttendanceRecord {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub attendance: Attendance,
    pub user_name: String,
    pub department_name: Option<String>,
}

/// HR-entered attendance row
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCreate {
    pub user_id: i64,
    pub date: NaiveDate,
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: AttendanceStatus,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub check_in: Option<i64>,
    pub check_out: Option<i64>,
    pub status: Option<AttendanceStatus>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Self-service check-in
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    /// Only `work-from-home` may be requested; otherwise present/late is derived
    pub work_from_home: Option<bool>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Self-service check-out
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half-day\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::WorkFromHome).unwrap(),
            "\"work-from-home\""
        );
    }

    #[test]
    fn test_record_flattens_attendance() {
        let record = AttendanceRecord {
            attendance: Attendance {
                id: 1,
                user_id: 2,
                date: NaiveDate::from_ymd_opt(2023, 4, 3).unwrap(),
                check_in: Some(10),
                check_out: None,
                status: AttendanceStatus::Present,
                notes: None,
                created_at: 0,
                updated_at: 0,
            },
            user_name: "Ada".into(),
            department_name: Some("Engineering".into()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], 2);
        assert_eq!(json["date"], "2023-04-03");
        assert_eq!(json["userName"], "Ada");
        assert!(json.get("attendance").is_none());
    }
}
