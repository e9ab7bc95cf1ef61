//! Shared types for the HR service
//!
//! Domain models, the capability table, aggregation rules and the unified
//! error type used by `hr-server` and its clients.

pub mod access;
pub mod error;
pub mod models;
pub mod request;
pub mod rules;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

pub use access::Capability;
pub use error::{AppError, AppResult, ErrorCode};
