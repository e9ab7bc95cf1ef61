//! Attendance aggregation
//!
//! Pure functions over attendance rows already loaded from the database.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::models::{Attendance, AttendanceStatus};

/// Count Monday-to-Friday dates in `[start, end]`.
///
/// No holiday calendar is consulted. Returns 0 when `start > end`.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }
    let days = (end - start).num_days() + 1;
    let (weeks, rest) = (days / 7, days % 7);
    let first = i64::from(start.weekday().num_days_from_monday());
    let tail = (first..first + rest).filter(|d| d % 7 < 5).count() as i64;
    u32::try_from(weeks * 5 + tail).unwrap_or(u32::MAX)
}

/// `(present + late) / working_days * 100`, rounded to one decimal.
///
/// Defined as 100 when there are no working days in the range.
pub fn attendance_percentage(records: &[Attendance], working_days: u32) -> f64 {
    let attended = records
        .iter()
        .filter(|r| matches!(r.status, AttendanceStatus::Present | AttendanceStatus::Late))
        .count();
    percentage(attended as u32, working_days)
}

fn percentage(attended: u32, working_days: u32) -> f64 {
    if working_days == 0 {
        return 100.0;
    }
    let raw = f64::from(attended) / f64::from(working_days) * 100.0;
    (raw * 10.0).round() / 10.0
}

/// Mean of `check_out - check_in` over rows that have both, as `"Hh Mm"`.
///
/// Hours are floored and the remaining minutes rounded; `"0h 0m"` when no
/// row qualifies.
pub fn average_work_hours(records: &[Attendance]) -> String {
    let durations: Vec<i64> = records
        .iter()
        .filter_map(|r| match (r.check_in, r.check_out) {
            (Some(i), Some(o)) => Some(o - i),
            _ => None,
        })
        .collect();

    if durations.is_empty() {
        return format_minutes(0.0);
    }

    let total_minutes: f64 = durations.iter().map(|ms| *ms as f64 / 60_000.0).sum();
    format_minutes(total_minutes / durations.len() as f64)
}

fn format_minutes(avg_minutes: f64) -> String {
    let mut hours = (avg_minutes / 60.0).floor() as i64;
    let mut minutes = (avg_minutes - hours as f64 * 60.0).round() as i64;
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }
    format!("{hours}h {minutes}m")
}

/// Status of a self-service check-in made at local time `at`.
///
/// Arriving after `work_start + grace_minutes` counts as late.
pub fn check_in_status(at: NaiveTime, work_start: NaiveTime, grace_minutes: u32) -> AttendanceStatus {
    let cutoff = work_start + chrono::Duration::minutes(i64::from(grace_minutes));
    // Wrapping past midnight means every check-in is on time
    if cutoff < work_start || at <= cutoff {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::Late
    }
}

/// Aggregated attendance for one user (or team) over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_days: u32,
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub work_from_home: u32,
    pub attendance_percentage: f64,
    pub average_work_hours: String,
}

/// Summarize `records` for the inclusive range `[start, end]`.
///
/// Rows outside the range are ignored.
pub fn attendance_stats(records: &[Attendance], start: NaiveDate, end: NaiveDate) -> AttendanceStats {
    let in_range: Vec<Attendance> = records
        .iter()
        .filter(|r| r.date >= start && r.date <= end)
        .cloned()
        .collect();

    let count = |status: AttendanceStatus| in_range.iter().filter(|r| r.status == status).count() as u32;
    let days = working_days(start, end);

    AttendanceStats {
        start_date: start,
        end_date: end,
        working_days: days,
        present: count(AttendanceStatus::Present),
        late: count(AttendanceStatus::Late),
        absent: count(AttendanceStatus::Absent),
        half_day: count(AttendanceStatus::HalfDay),
        work_from_home: count(AttendanceStatus::WorkFromHome),
        attendance_percentage: attendance_percentage(&in_range, days),
        average_work_hours: average_work_hours(&in_range),
    }
}

/// Reject a check-out earlier than the check-in when both are known
pub fn ensure_check_out_after(check_in: Option<i64>, check_out: Option<i64>) -> Result<(), AppError> {
    match (check_in, check_out) {
        (Some(i), Some(o)) if o < i => Err(AppError::new(ErrorCode::CheckOutBeforeCheckIn)
            .with_detail("checkIn", i)
            .with_detail("checkOut", o)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_check_out_ordering() {
        assert!(ensure_check_out_after(Some(1_000), Some(2_000)).is_ok());
        assert!(ensure_check_out_after(Some(1_000), Some(1_000)).is_ok());
        assert!(ensure_check_out_after(None, Some(1_000)).is_ok());
        assert!(ensure_check_out_after(Some(1_000), None).is_ok());
        let err = ensure_check_out_after(Some(2_000), Some(1_000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CheckOutBeforeCheckIn);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn millis(d: NaiveDate, h: u32, m: u32) -> i64 {
        d.and_hms_opt(h, m, 0).unwrap().and_utc().timestamp_millis()
    }

    fn record(day: NaiveDate, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: 1,
            user_id: 1,
            date: day,
            check_in: None,
            check_out: None,
            status,
            notes: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_working_days_full_week() {
        // Mon 2023-04-03 .. Fri 2023-04-07
        assert_eq!(working_days(date(2023, 4, 3), date(2023, 4, 7)), 5);
    }

    #[test]
    fn test_working_days_weekend_only() {
        // Sat 2023-04-01 .. Sun 2023-04-02
        assert_eq!(working_days(date(2023, 4, 1), date(2023, 4, 2)), 0);
    }

    #[test]
    fn test_working_days_month_and_reversed() {
        assert_eq!(working_days(date(2023, 4, 1), date(2023, 4, 30)), 20);
        assert_eq!(working_days(date(2023, 4, 3), date(2023, 4, 3)), 1);
        assert_eq!(working_days(date(2023, 4, 7), date(2023, 4, 3)), 0);
    }

    #[test]
    fn test_working_days_matches_brute_force() {
        let brute = |start: NaiveDate, end: NaiveDate| {
            start
                .iter_days()
                .take_while(|d| *d <= end)
                .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
                .count() as u32
        };
        // every starting weekday, lengths across several weeks
        for offset in 0..7 {
            let start = date(2024, 1, 1) + chrono::Duration::days(offset);
            for len in 0..60 {
                let end = start + chrono::Duration::days(len);
                assert_eq!(
                    working_days(start, end),
                    brute(start, end),
                    "start {start}, range of {len} days"
                );
            }
        }
        let (start, end) = (date(2020, 2, 27), date(2024, 3, 1));
        assert_eq!(working_days(start, end), brute(start, end));
    }

    #[test]
    fn test_working_days_extreme_range() {
        // 400k years: exactly 5/7 of the days when the day count is a multiple of 7
        let start = NaiveDate::from_ymd_opt(-200_000, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(200_000, 12, 31).unwrap();
        let days = (end - start).num_days() + 1;
        let count = i64::from(working_days(start, end));
        assert!((count - days * 5 / 7).abs() <= 5);
    }

    #[test]
    fn test_percentage_zero_working_days_is_100() {
        assert_eq!(attendance_percentage(&[], 0), 100.0);
    }

    #[test]
    fn test_percentage_counts_present_and_late() {
        let mut records = Vec::new();
        for i in 0..18 {
            records.push(record(date(2023, 4, 1) + chrono::Duration::days(i), AttendanceStatus::Present));
        }
        records.push(record(date(2023, 4, 20), AttendanceStatus::Late));
        records.push(record(date(2023, 4, 21), AttendanceStatus::Late));
        records.push(record(date(2023, 4, 24), AttendanceStatus::Absent));
        records.push(record(date(2023, 4, 25), AttendanceStatus::WorkFromHome));
        assert_eq!(attendance_percentage(&records, 20), 100.0);
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(0, 5), 0.0);
    }

    #[test]
    fn test_average_hours_empty() {
        assert_eq!(average_work_hours(&[]), "0h 0m");
        // rows without check-out are ignored
        let mut r = record(date(2023, 4, 3), AttendanceStatus::Present);
        r.check_in = Some(millis(date(2023, 4, 3), 9, 0));
        assert_eq!(average_work_hours(&[r]), "0h 0m");
    }

    #[test]
    fn test_average_hours_single_record() {
        let day = date(2023, 4, 3);
        let mut r = record(day, AttendanceStatus::Present);
        r.check_in = Some(millis(day, 9, 0));
        r.check_out = Some(millis(day, 17, 30));
        assert_eq!(average_work_hours(&[r]), "8h 30m");
    }

    #[test]
    fn test_average_hours_mean() {
        let day = date(2023, 4, 3);
        let mut a = record(day, AttendanceStatus::Present);
        a.check_in = Some(millis(day, 9, 0));
        a.check_out = Some(millis(day, 17, 0));
        let mut b = record(day, AttendanceStatus::Late);
        b.check_in = Some(millis(day, 10, 0));
        b.check_out = Some(millis(day, 17, 0));
        // (480 + 420) / 2 = 450 minutes
        assert_eq!(average_work_hours(&[a, b]), "7h 30m");
    }

    #[test]
    fn test_format_minutes_carries_rounding() {
        assert_eq!(format_minutes(119.7), "2h 0m");
        assert_eq!(format_minutes(61.2), "1h 1m");
    }

    #[test]
    fn test_check_in_status() {
        let start = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let on_time = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        let late = NaiveTime::from_hms_opt(9, 16, 0).unwrap();
        assert_eq!(check_in_status(on_time, start, 15), AttendanceStatus::Present);
        assert_eq!(check_in_status(late, start, 15), AttendanceStatus::Late);
        assert_eq!(check_in_status(late, start, 0), AttendanceStatus::Late);
    }

    #[test]
    fn test_stats_ignores_rows_outside_range() {
        let start = date(2023, 4, 3);
        let end = date(2023, 4, 7);
        let records = vec![
            record(date(2023, 4, 3), AttendanceStatus::Present),
            record(date(2023, 4, 4), AttendanceStatus::Late),
            record(date(2023, 4, 5), AttendanceStatus::Absent),
            record(date(2023, 4, 6), AttendanceStatus::HalfDay),
            record(date(2023, 4, 10), AttendanceStatus::Present),
        ];
        let stats = attendance_stats(&records, start, end);
        assert_eq!(stats.working_days, 5);
        assert_eq!(stats.present, 1);
        assert_eq!(stats.late, 1);
        assert_eq!(stats.absent, 1);
        assert_eq!(stats.half_day, 1);
        assert_eq!(stats.work_from_home, 0);
        assert_eq!(stats.attendance_percentage, 40.0);
        assert_eq!(stats.average_work_hours, "0h 0m");
    }
}
