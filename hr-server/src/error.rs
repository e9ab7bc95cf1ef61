//! Unified service-layer error type for hr-server
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so handlers propagate with `?`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Db(BoxError),
    #[error(transparent)]
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Map a constraint violation to a business error by constraint name.
///
/// Unique violations (SQLSTATE 23505) default to `AlreadyExists` and
/// foreign-key violations (23503) to `NotFound` when the constraint is not
/// listed. Any other database error stays a `Db` error.
pub fn map_constraint(e: sqlx::Error, constraints: &[(&str, ErrorCode)]) -> ServiceError {
    let Some(db) = e.as_database_error() else {
        return e.into();
    };
    let fallback = if db.is_unique_violation() {
        ErrorCode::AlreadyExists
    } else if db.is_foreign_key_violation() {
        ErrorCode::NotFound
    } else {
        return e.into();
    };
    let name = db.constraint().unwrap_or_default();
    let code = constraints
        .iter()
        .find(|(c, _)| *c == name)
        .map(|(_, code)| *code)
        .unwrap_or(fallback);
    tracing::debug!(constraint = name, code = %code, "Constraint violation");
    ServiceError::App(AppError::new(code).with_detail("constraint", name))
}
