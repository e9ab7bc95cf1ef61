//! Aggregation rules
//!
//! Deterministic computations over records already fetched from the store.
//! Nothing in here touches the database or the clock.

pub mod attendance;
pub mod leave;
pub mod payroll;

pub use attendance::{
    AttendanceStats, attendance_percentage, attendance_stats, average_work_hours, check_in_status,
    ensure_check_out_after, working_days,
};
pub use leave::{ensure_no_overlap, ensure_reviewable, find_overlap, leave_duration};
pub use payroll::{YearSummary, net_salary, year_summary};
