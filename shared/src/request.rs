//! Request and listing types shared by every paginated endpoint

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::models::{AttendanceStatus, LeaveStatus, PayslipStatus, Role};

/// Default page size when the client does not send `limit`
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound for `limit`
pub const MAX_LIMIT: u32 = 100;

/// Pagination query parameters (`?page=2&limit=20`)
///
/// Filter structs embed these two fields directly instead of flattening,
/// because url-encoded flattening loses numeric types.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    pub page: Option<u32>,
    /// Items per page (default: 10, max: 100)
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self { page, limit }
    }

    /// Page number, at least 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Items per page, clamped to `1..=MAX_LIMIT`
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Row offset for database queries
    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * i64::from(self.limit())
    }

    /// Build the response metadata for a query that matched `total` rows
    pub fn paginate(&self, total: i64) -> Pagination {
        Pagination::new(total, self.page(), self.limit())
    }
}

/// Pagination metadata: `{ total, page, limit, totalPages }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: u32, limit: u32) -> Self {
        let total = total.max(0);
        let limit_i = i64::from(limit.max(1));
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit_i - 1) / limit_i,
        }
    }
}

// ── List filters ────────────────────────────────────────────────────
//
// `department` is a department id everywhere.

macro_rules! paginated {
    ($ty:ty) => {
        impl $ty {
            pub fn pagination(&self) -> PaginationQuery {
                PaginationQuery::new(self.page, self.limit)
            }
        }
    };
}

/// `GET /admin/users`, `GET /hr/employees`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<Role>,
    pub department: Option<i64>,
    /// Case-insensitive match on name, email or position
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(UserQuery);

/// Attendance listing, HR and self-service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub user_id: Option<i64>,
    pub department: Option<i64>,
    pub status: Option<AttendanceStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(AttendanceQuery);

impl AttendanceQuery {
    pub fn range(&self) -> DateRangeQuery {
        DateRangeQuery {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Leave listing, HR and self-service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveQuery {
    pub user_id: Option<i64>,
    pub department: Option<i64>,
    pub status: Option<LeaveStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(LeaveQuery);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipQuery {
    pub user_id: Option<i64>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub status: Option<PayslipStatus>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(PayslipQuery);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub user_id: Option<i64>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(DocumentQuery);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementQuery {
    pub category: Option<String>,
    pub important: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
paginated!(AnnouncementQuery);

/// Inclusive date range; either bound may default
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Longest range a stats query may cover, in days
pub const MAX_RANGE_DAYS: i64 = 366;

impl DateRangeQuery {
    /// Resolve missing bounds with `default`; reject reversed ranges and
    /// ones longer than [`MAX_RANGE_DAYS`]
    pub fn resolve(&self, default: (NaiveDate, NaiveDate)) -> Result<(NaiveDate, NaiveDate), AppError> {
        let start = self.start_date.unwrap_or(default.0);
        let end = self.end_date.unwrap_or(default.1);
        crate::rules::leave::validate_range(start, end)?;
        if (end - start).num_days() + 1 > MAX_RANGE_DAYS {
            return Err(AppError::with_message(
                ErrorCode::InvalidDateRange,
                format!("Date range must not exceed {MAX_RANGE_DAYS} days"),
            )
            .with_detail("startDate", start.to_string())
            .with_detail("endDate", end.to_string()));
        }
        Ok((start, end))
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let q = PaginationQuery::default();
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let q = PaginationQuery::new(Some(0), Some(1000));
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), MAX_LIMIT);

        let q = PaginationQuery::new(Some(3), Some(0));
        assert_eq!(q.limit(), 1);
        assert_eq!(q.offset(), 2);
    }

    #[test]
    fn test_offset() {
        let q = PaginationQuery::new(Some(3), Some(20));
        assert_eq!(q.offset(), 40);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Pagination::new(0, 1, 10).total_pages, 0);
        assert_eq!(Pagination::new(10, 1, 10).total_pages, 1);
        assert_eq!(Pagination::new(11, 1, 10).total_pages, 2);
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::new(25, 2, 10)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["total"], 25);
    }

    #[test]
    fn test_filters_from_query_string() {
        let q: LeaveQuery = serde_json::from_value(serde_json::json!({
            "userId": 5,
            "status": "approved",
            "startDate": "2023-04-01",
            "limit": 500
        }))
        .unwrap();
        assert_eq!(q.user_id, Some(5));
        assert_eq!(q.status, Some(LeaveStatus::Approved));
        assert_eq!(q.start_date, NaiveDate::from_ymd_opt(2023, 4, 1));
        assert_eq!(q.pagination().limit(), MAX_LIMIT);
        assert_eq!(q.pagination().page(), 1);
    }

    #[test]
    fn test_date_range_resolve() {
        let d = |day| NaiveDate::from_ymd_opt(2023, 4, day).unwrap();
        let q = DateRangeQuery { start_date: Some(d(3)), end_date: None };
        assert_eq!(q.resolve((d(1), d(30))).unwrap(), (d(3), d(30)));

        let q = DateRangeQuery { start_date: Some(d(20)), end_date: Some(d(10)) };
        assert!(q.resolve((d(1), d(30))).is_err());
    }

    #[test]
    fn test_date_range_length_capped() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let default = (day(2024, 6, 1), day(2024, 6, 30));

        // leap year: Jan 1 .. Dec 31 is exactly 366 days
        let q = DateRangeQuery { start_date: Some(day(2024, 1, 1)), end_date: Some(day(2024, 12, 31)) };
        assert!(q.resolve(default).is_ok());

        let q = DateRangeQuery { start_date: Some(day(2024, 1, 1)), end_date: Some(day(2025, 1, 1)) };
        let err = q.resolve(default).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);

        let q = DateRangeQuery { start_date: Some(day(-200_000, 1, 1)), end_date: None };
        assert_eq!(q.resolve(default).unwrap_err().code, ErrorCode::InvalidDateRange);
    }

    #[test]
    fn test_attendance_query_range() {
        let q: AttendanceQuery = serde_json::from_value(serde_json::json!({
            "startDate": "2023-04-03",
            "status": "late"
        }))
        .unwrap();
        let range = q.range();
        assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2023, 4, 3));
        assert_eq!(range.end_date, None);
    }
}
