//! Self-service routes (`self:service`)
//!
//! Every handler scopes its queries to the calling user. Publishing and
//! removing announcements additionally needs `content:publish`.

mod announcements;
mod attendance;
mod leaves;
mod payslips;
mod profile;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use shared::access::Capability;

use crate::auth::require;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let own = Router::new()
        .route("/attendance", get(attendance::list))
        .route("/attendance/check-in", post(attendance::check_in))
        .route("/attendance/check-out", post(attendance::check_out))
        .route("/leaves", get(leaves::list).post(leaves::create))
        .route("/leaves/{id}", delete(leaves::cancel))
        .route("/profile", get(profile::get).put(profile::update))
        .route("/documents", get(profile::documents))
        .route("/payslips", get(payslips::list))
        .route("/payslips/summary", get(payslips::summary))
        .route("/announcements", get(announcements::list))
        .layer(middleware::from_fn(require(Capability::SelfService)));

    let publish = Router::new()
        .route("/announcements", post(announcements::create))
        .route("/announcements/{id}", delete(announcements::delete))
        .layer(middleware::from_fn(require(Capability::PublishContent)));

    own.merge(publish)
}
