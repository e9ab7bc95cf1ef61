//! Unified error codes for the HR service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Organization errors (users, departments, policies)
//! - 4xxx: Attendance errors
//! - 5xxx: Leave errors
//! - 6xxx: Payroll errors
//! - 7xxx: Content errors (documents, announcements)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so clients can switch on a
/// stable number instead of parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Too many requests
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Resource belongs to another user
    NotOwner = 2002,

    // ==================== 3xxx: Organization ====================
    /// User not found
    UserNotFound = 3001,
    /// User email already exists
    EmailExists = 3002,
    /// Cannot delete self
    CannotDeleteSelf = 3003,
    /// Department not found
    DepartmentNotFound = 3101,
    /// Department name already exists
    DepartmentNameExists = 3102,
    /// Department still has members
    DepartmentHasMembers = 3103,
    /// Leave policy not found
    LeavePolicyNotFound = 3201,
    /// Leave policy name already exists
    LeavePolicyNameExists = 3202,
    /// Salary structure not found
    SalaryStructureNotFound = 3301,
    /// Salary structure name already exists
    SalaryStructureNameExists = 3302,

    // ==================== 4xxx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 4001,
    /// Attendance already recorded for that user and day
    AttendanceExists = 4002,
    /// Already checked out today
    AlreadyCheckedOut = 4003,
    /// Check-out earlier than check-in
    CheckOutBeforeCheckIn = 4004,

    // ==================== 5xxx: Leave ====================
    /// Leave request not found
    LeaveNotFound = 5001,
    /// Leave overlaps an existing request
    LeaveOverlap = 5002,
    /// Leave has already been reviewed
    LeaveAlreadyReviewed = 5003,
    /// End date before start date
    InvalidDateRange = 5004,

    // ==================== 6xxx: Payroll ====================
    /// Payslip not found
    PayslipNotFound = 6001,
    /// Payslip already exists for that user and period
    PayslipExists = 6002,
    /// Negative amount
    NegativeAmount = 6003,
    /// Amount exceeds what a payroll column can hold
    AmountOutOfRange = 6004,

    // ==================== 7xxx: Content ====================
    /// Document not found
    DocumentNotFound = 7001,
    /// Announcement not found
    AnnouncementNotFound = 7101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotOwner => "Resource belongs to another user",

            // Organization
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailExists => "Email already exists",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentNameExists => "Department name already exists",
            ErrorCode::DepartmentHasMembers => "Department still has members",
            ErrorCode::LeavePolicyNotFound => "Leave policy not found",
            ErrorCode::LeavePolicyNameExists => "Leave policy name already exists",
            ErrorCode::SalaryStructureNotFound => "Salary structure not found",
            ErrorCode::SalaryStructureNameExists => "Salary structure name already exists",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",
            ErrorCode::AttendanceExists => "Attendance already recorded for this day",
            ErrorCode::AlreadyCheckedOut => "Already checked out for this day",
            ErrorCode::CheckOutBeforeCheckIn => "Check-out time is earlier than check-in",

            // Leave
            ErrorCode::LeaveNotFound => "Leave request not found",
            ErrorCode::LeaveOverlap => "Leave request overlaps an existing request",
            ErrorCode::LeaveAlreadyReviewed => "Leave request has already been reviewed",
            ErrorCode::InvalidDateRange => "End date is before start date",

            // Payroll
            ErrorCode::PayslipNotFound => "Payslip not found",
            ErrorCode::PayslipExists => "Payslip already exists for this period",
            ErrorCode::NegativeAmount => "Amount must not be negative",
            ErrorCode::AmountOutOfRange => "Amount is out of range",

            // Content
            ErrorCode::DocumentNotFound => "Document not found",
            ErrorCode::AnnouncementNotFound => "Announcement not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::NotOwner),

            // Organization
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailExists),
            3003 => Ok(ErrorCode::CannotDeleteSelf),
            3101 => Ok(ErrorCode::DepartmentNotFound),
            3102 => Ok(ErrorCode::DepartmentNameExists),
            3103 => Ok(ErrorCode::DepartmentHasMembers),
            3201 => Ok(ErrorCode::LeavePolicyNotFound),
            3202 => Ok(ErrorCode::LeavePolicyNameExists),
            3301 => Ok(ErrorCode::SalaryStructureNotFound),
            3302 => Ok(ErrorCode::SalaryStructureNameExists),

            // Attendance
            4001 => Ok(ErrorCode::AttendanceNotFound),
            4002 => Ok(ErrorCode::AttendanceExists),
            4003 => Ok(ErrorCode::AlreadyCheckedOut),
            4004 => Ok(ErrorCode::CheckOutBeforeCheckIn),

            // Leave
            5001 => Ok(ErrorCode::LeaveNotFound),
            5002 => Ok(ErrorCode::LeaveOverlap),
            5003 => Ok(ErrorCode::LeaveAlreadyReviewed),
            5004 => Ok(ErrorCode::InvalidDateRange),

            // Payroll
            6001 => Ok(ErrorCode::PayslipNotFound),
            6002 => Ok(ErrorCode::PayslipExists),
            6003 => Ok(ErrorCode::NegativeAmount),
            6004 => Ok(ErrorCode::AmountOutOfRange),

            // Content
            7001 => Ok(ErrorCode::DocumentNotFound),
            7101 => Ok(ErrorCode::AnnouncementNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::UserNotFound.code(), 3001);
        assert_eq!(ErrorCode::AttendanceExists.code(), 4002);
        assert_eq!(ErrorCode::LeaveOverlap.code(), 5002);
        assert_eq!(ErrorCode::PayslipExists.code(), 6002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrips_every_listed_code() {
        for value in [0u16, 2, 3, 1001, 1004, 2001, 3102, 4004, 5003, 6003, 6004, 7101, 9005] {
            let code = ErrorCode::try_from(value).unwrap();
            assert_eq!(code.code(), value);
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(8888), Err(InvalidErrorCode(8888)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::LeaveOverlap).unwrap();
        assert_eq!(json, "5002");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::AttendanceExists);
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::TokenExpired.to_string(), "1003");
    }
}
