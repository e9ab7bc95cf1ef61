//! Database access layer
//!
//! Free async functions over `&PgPool` (or a transaction), one module per
//! table. Every function returns [`ServiceResult`] so handlers can use `?`.

pub mod announcements;
pub mod attendance;
pub mod dashboard;
pub mod departments;
pub mod documents;
pub mod leave_policies;
pub mod leaves;
pub mod payslips;
pub mod salary_structures;
pub mod users;

pub use crate::error::ServiceResult;
pub use shared::util::{now_millis, snowflake_id};

/// Convert pagination bounds for `LIMIT`/`OFFSET` binds
pub(crate) fn page_bounds(page: &shared::request::PaginationQuery) -> (i64, i64) {
    (i64::from(page.limit()), page.offset())
}
