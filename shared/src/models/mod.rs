//! Data models
//!
//! Shared between hr-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; JSON field names are camelCase.

pub mod announcement;
pub mod attendance;
pub mod department;
pub mod document;
pub mod leave;
pub mod leave_policy;
pub mod payslip;
pub mod role;
pub mod salary_structure;
pub mod user;

// Re-exports
pub use announcement::*;
pub use attendance::*;
pub use department::*;
pub use document::*;
pub use leave::*;
pub use leave_policy::*;
pub use payslip::*;
pub use role::*;
pub use salary_structure::*;
pub use user::*;
