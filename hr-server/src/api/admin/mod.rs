//! Admin routes: user accounts and organization settings
//!
//! Users need `users:manage`. Departments, leave policies and salary
//! structures are readable with `org:view` and writable with `org:manage`.

mod org;
mod users;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post, put};
use shared::access::Capability;

use crate::auth::require;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let users = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/{id}",
            get(users::get).put(users::update).delete(users::delete),
        )
        .layer(middleware::from_fn(require(Capability::ManageUsers)));

    let org_read = Router::new()
        .route("/departments", get(org::list_departments))
        .route("/departments/{id}", get(org::get_department))
        .route("/leave-policies", get(org::list_leave_policies))
        .route("/salary-structures", get(org::list_salary_structures))
        .layer(middleware::from_fn(require(Capability::ViewOrgSettings)));

    let org_write = Router::new()
        .route("/departments", post(org::create_department))
        .route(
            "/departments/{id}",
            put(org::update_department).delete(org::delete_department),
        )
        .route("/leave-policies", post(org::create_leave_policy))
        .route(
            "/leave-policies/{id}",
            put(org::update_leave_policy).delete(org::delete_leave_policy),
        )
        .route(
            "/salary-structures",
            post(org::create_salary_structure),
        )
        .route(
            "/salary-structures/{id}",
            put(org::update_salary_structure).delete(org::delete_salary_structure),
        )
        .layer(middleware::from_fn(require(Capability::ManageOrgSettings)));

    Router::new().merge(users).merge(org_read).merge(org_write)
}
