//! HR workspace routes (`hr:workspace`)

mod attendance;
mod dashboard;
mod documents;
mod employees;
mod leaves;
mod payroll;

use axum::Router;
use axum::middleware;
use axum::routing::{get, patch, put};
use shared::access::Capability;

use crate::auth::require;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::summary))
        .route("/employees", get(employees::list))
        .route("/employees/{id}", get(employees::detail))
        .route(
            "/attendance",
            get(attendance::list).post(attendance::create),
        )
        .route("/attendance/stats", get(attendance::stats))
        .route(
            "/attendance/{id}",
            put(attendance::update).delete(attendance::delete),
        )
        .route("/leaves", get(leaves::list))
        .route("/leaves/{id}", get(leaves::get))
        .route("/leaves/{id}/review", patch(leaves::review))
        .route("/payroll", get(payroll::list).post(payroll::create))
        .route(
            "/payroll/{id}",
            get(payroll::get).put(payroll::update).delete(payroll::delete),
        )
        .route("/payroll/{id}/status", patch(payroll::set_status))
        .route("/documents", get(documents::list).post(documents::create))
        .route("/documents/{id}", axum::routing::delete(documents::delete))
        .layer(middleware::from_fn(require(Capability::HrWorkspace)))
}
