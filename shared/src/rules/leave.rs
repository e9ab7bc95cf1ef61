//! Leave rules: duration, overlap, review transitions

use chrono::NaiveDate;

use crate::error::{AppError, ErrorCode};
use crate::models::{Leave, LeaveStatus};

/// Inclusive number of calendar days in `[start, end]`.
///
/// Calendar dates have no time part, so the day difference is already whole
/// and needs no ceiling.
pub fn leave_duration(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Two inclusive ranges overlap when each starts no later than the other ends.
/// A shared boundary day counts as overlap.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// First existing leave that overlaps the candidate range, whatever its status.
pub fn find_overlap(existing: &[Leave], start: NaiveDate, end: NaiveDate) -> Option<&Leave> {
    existing
        .iter()
        .find(|l| ranges_overlap(l.start_date, l.end_date, start, end))
}

/// Reject a range whose end precedes its start.
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::new(ErrorCode::InvalidDateRange)
            .with_detail("startDate", start.to_string())
            .with_detail("endDate", end.to_string()));
    }
    Ok(())
}

/// Check a candidate request against the user's existing leaves.
pub fn ensure_no_overlap(existing: &[Leave], start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    validate_range(start, end)?;
    match find_overlap(existing, start, end) {
        Some(clash) => Err(AppError::new(ErrorCode::LeaveOverlap)
            .with_detail("conflictingLeaveId", clash.id)
            .with_detail("conflictingStartDate", clash.start_date.to_string())
            .with_detail("conflictingEndDate", clash.end_date.to_string())),
        None => Ok(()),
    }
}

/// Validate a review decision against the current status.
///
/// Only `pending` requests can be decided, and only to `approved` or
/// `rejected`; there is no path back to `pending`.
pub fn ensure_reviewable(current: LeaveStatus, decision: LeaveStatus) -> Result<(), AppError> {
    if decision == LeaveStatus::Pending {
        return Err(AppError::validation("Decision must be approved or rejected")
            .with_detail("field", "status"));
    }
    if current != LeaveStatus::Pending {
        return Err(AppError::new(ErrorCode::LeaveAlreadyReviewed)
            .with_detail("currentStatus", serde_json::json!(current)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn leave(id: i64, start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> Leave {
        Leave {
            id,
            user_id: 1,
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            reason: "x".into(),
            status,
            reviewed_by: None,
            reviewed_at: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_duration_inclusive() {
        assert_eq!(leave_duration(date(2023, 4, 15), date(2023, 4, 20)), 6);
        assert_eq!(leave_duration(date(2023, 4, 15), date(2023, 4, 15)), 1);
        // spans a month boundary
        assert_eq!(leave_duration(date(2023, 1, 30), date(2023, 2, 2)), 4);
    }

    #[test]
    fn test_shared_boundary_day_overlaps() {
        let existing = vec![leave(7, date(2023, 4, 10), date(2023, 4, 15), LeaveStatus::Approved)];
        let err = ensure_no_overlap(&existing, date(2023, 4, 15), date(2023, 4, 18)).unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveOverlap);
        assert_eq!(err.http_status(), http::StatusCode::CONFLICT);
        assert_eq!(err.details.unwrap()["conflictingLeaveId"], 7);
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let existing = vec![leave(1, date(2023, 4, 10), date(2023, 4, 15), LeaveStatus::Pending)];
        assert!(ensure_no_overlap(&existing, date(2023, 4, 16), date(2023, 4, 18)).is_ok());
        assert!(ensure_no_overlap(&existing, date(2023, 4, 1), date(2023, 4, 9)).is_ok());
    }

    #[test]
    fn test_containment_overlaps() {
        let existing = vec![leave(1, date(2023, 4, 10), date(2023, 4, 15), LeaveStatus::Pending)];
        assert!(find_overlap(&existing, date(2023, 4, 11), date(2023, 4, 12)).is_some());
        assert!(find_overlap(&existing, date(2023, 4, 1), date(2023, 4, 30)).is_some());
    }

    #[test]
    fn test_rejected_leave_still_counts() {
        let existing = vec![leave(1, date(2023, 4, 10), date(2023, 4, 15), LeaveStatus::Rejected)];
        assert!(find_overlap(&existing, date(2023, 4, 12), date(2023, 4, 13)).is_some());
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = ensure_no_overlap(&[], date(2023, 4, 20), date(2023, 4, 15)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
    }

    #[test]
    fn test_review_transitions() {
        assert!(ensure_reviewable(LeaveStatus::Pending, LeaveStatus::Approved).is_ok());
        assert!(ensure_reviewable(LeaveStatus::Pending, LeaveStatus::Rejected).is_ok());

        let err = ensure_reviewable(LeaveStatus::Approved, LeaveStatus::Rejected).unwrap_err();
        assert_eq!(err.code, ErrorCode::LeaveAlreadyReviewed);

        let err = ensure_reviewable(LeaveStatus::Pending, LeaveStatus::Pending).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
