//! API routes for hr-server
//!
//! | Prefix | Gate |
//! |---|---|
//! | `/health`, `POST /api/auth/login` | public (login is rate limited) |
//! | `/api/auth/*` | any session |
//! | `/api/admin/*` | `users:manage`, `org:view` / `org:manage` |
//! | `/api/hr/*` | `hr:workspace` |
//! | `/api/employee/*` | `self:service`, announcements writes `content:publish` |
//! | `/api/team-lead/*` | `team:workspace` |

pub mod admin;
pub mod auth;
pub mod employee;
pub mod extract;
pub mod health;
pub mod hr;
pub mod team_lead;

use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue, StatusCode};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::request::Pagination;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{rate_limit::login_rate_limit, resolve_caller};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Paginated list body: `{ <key>: [...], pagination: {...} }`
#[derive(Debug, Serialize)]
pub struct Page {
    #[serde(flatten)]
    items: serde_json::Map<String, serde_json::Value>,
    pagination: Pagination,
}

impl Page {
    pub fn new<T: Serialize>(
        key: &str,
        rows: Vec<T>,
        pagination: Pagination,
    ) -> Result<Self, AppError> {
        let value = serde_json::to_value(rows).map_err(|e| AppError::internal(e.to_string()))?;
        let mut items = serde_json::Map::new();
        items.insert(key.to_string(), value);
        Ok(Self { items, pagination })
    }

    /// Add a sibling field next to the rows
    pub fn with<V: Serialize>(mut self, key: &str, value: V) -> Result<Self, AppError> {
        let value = serde_json::to_value(value).map_err(|e| AppError::internal(e.to_string()))?;
        self.items.insert(key.to_string(), value);
        Ok(self)
    }
}

/// `Option` row from the store, or a not-found error with `code`
pub fn found<T>(row: Option<T>, code: ErrorCode) -> Result<T, AppError> {
    row.ok_or_else(|| AppError::new(code))
}

pub fn created<T>(body: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(body)))
}

/// Body of a successful delete, or a not-found error with `code`
pub fn deleted(id: i64, removed: bool, code: ErrorCode) -> ApiResult<serde_json::Value> {
    if !removed {
        return Err(AppError::new(code));
    }
    Ok(Json(serde_json::json!({ "id": id, "deleted": true })))
}

/// Routes behind the access gate
fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth::session_router())
        .nest("/api/admin", admin::router())
        .nest("/api/hr", hr::router())
        .nest("/api/employee", employee::router())
        .nest("/api/team-lead", team_lead::router())
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            login_rate_limit,
        ));

    let protected = protected_routes().layer(middleware::from_fn_with_state(
        state.sessions.clone(),
        resolve_caller,
    ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(login)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Set must wrap Propagate so the generated id reaches the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use shared::models::Role;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    /// State with a pool that never connects; routes under test must be
    /// rejected by the gate before any query runs.
    fn test_state() -> AppState {
        let config = Config::from_lookup(|name| match name {
            "DATABASE_URL" => Some("postgres://unused@localhost/unused".into()),
            _ => None,
        })
        .unwrap();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        AppState::with_pool(pool, &config)
    }

    async fn send(app: Router, method: &str, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut req = http::Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(http::header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let (status, body) = send(create_router(test_state()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_no_session_is_401_on_every_family() {
        for uri in [
            "/api/admin/users",
            "/api/hr/leaves",
            "/api/employee/leaves",
            "/api/team-lead/members",
            "/api/auth/me",
        ] {
            let (status, body) = send(create_router(test_state()), "GET", uri, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());
        }
    }

    #[tokio::test]
    async fn test_employee_on_admin_route_is_403() {
        let state = test_state();
        let token = state.sessions.issue(10, "e@example.com", Role::Employee).unwrap();
        let (status, body) = send(create_router(state), "GET", "/api/admin/users", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::PermissionDenied.code());
    }

    #[tokio::test]
    async fn test_role_matrix_rejections() {
        let cases = [
            (Role::Employee, "GET", "/api/hr/leaves"),
            (Role::Employee, "GET", "/api/team-lead/members"),
            (Role::Employee, "POST", "/api/employee/announcements"),
            (Role::TeamLead, "GET", "/api/hr/employees"),
            (Role::TeamLead, "GET", "/api/admin/departments"),
            (Role::Hr, "GET", "/api/admin/users"),
            (Role::Hr, "POST", "/api/admin/departments"),
            (Role::Hr, "GET", "/api/team-lead/leaves"),
        ];
        for (role, method, uri) in cases {
            let state = test_state();
            let token = state.sessions.issue(10, "x@example.com", role).unwrap();
            let (status, _) = send(create_router(state), method, uri, Some(&token)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{role} {method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_capabilities_need_no_database() {
        let state = test_state();
        let token = state.sessions.issue(10, "hr@example.com", Role::Hr).unwrap();
        let (status, body) = send(create_router(state), "GET", "/api/auth/capabilities", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "hr");
        let caps: Vec<&str> = body["capabilities"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c.as_str())
            .collect();
        assert!(caps.contains(&"hr:workspace"));
        assert!(!caps.contains(&"users:manage"));
    }

    #[tokio::test]
    async fn test_login_is_rate_limited_per_ip() {
        let app = create_router(test_state());
        // Bodies are rejected before any query, but each attempt still counts
        for _ in 0..5 {
            let (status, _) = send(app.clone(), "POST", "/api/auth/login", None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        let (status, body) = send(app, "POST", "/api/auth/login", None).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["code"], ErrorCode::TooManyRequests.code());
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let req = http::Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = create_router(test_state()).oneshot(req).await.unwrap();
        assert!(resp.headers().contains_key("x-request-id"));
    }

    #[test]
    fn test_page_body_shape() {
        let page = Page::new("leaves", vec![1, 2], Pagination::new(12, 1, 10)).unwrap();
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["leaves"], serde_json::json!([1, 2]));
        assert_eq!(json["pagination"]["totalPages"], 2);

        let page = Page::new("attendance", Vec::<i32>::new(), Pagination::new(0, 1, 10))
            .unwrap()
            .with("stats", serde_json::json!({ "workingDays": 0 }))
            .unwrap();
        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["stats"]["workingDays"], 0);
        assert_eq!(json["pagination"]["total"], 0);
    }
}
