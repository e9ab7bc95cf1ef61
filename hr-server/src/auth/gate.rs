//! Access gate middleware
//!
//! `resolve_caller` authenticates the request and injects a [`Caller`];
//! `require` layers a capability check from [`shared::access`] on a route
//! family.

use std::future::Future;
use std::pin::Pin;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use shared::access::Capability;
use shared::error::AppError;

use super::session::{Caller, SessionKeys, bearer_token};

/// Resolve the caller from `Authorization: Bearer <jwt>`
///
/// | Condition | Error |
/// |---|---|
/// | no header | `NotAuthenticated` (401) |
/// | not a bearer value | `TokenInvalid` (401) |
/// | expired | `TokenExpired` (401) |
/// | bad signature / malformed | `TokenInvalid` (401) |
pub async fn resolve_caller(
    State(keys): State<SessionKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header {
        Some(value) => bearer_token(value)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "auth_missing");
            return Err(AppError::unauthorized());
        }
    };

    let caller = keys.verify(token).inspect_err(|e| {
        tracing::warn!(target: "security", uri = %req.uri(), code = %e.code, "auth_failed");
    })?;

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}

type GateFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// Capability check middleware
///
/// ```ignore
/// Router::new()
///     .route("/users", get(users::list))
///     .layer(middleware::from_fn(require(Capability::ManageUsers)));
/// ```
pub fn require(capability: Capability) -> impl Fn(Request, Next) -> GateFuture + Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let caller = req
                .extensions()
                .get::<Caller>()
                .ok_or_else(AppError::unauthorized)?;

            if !caller.role.can(capability) {
                tracing::warn!(
                    target: "security",
                    user_id = caller.user_id,
                    role = %caller.role,
                    capability = %capability,
                    "permission_denied"
                );
                return Err(AppError::forbidden(format!(
                    "Permission denied: {capability}"
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Handlers behind `resolve_caller` take `Caller` as an argument
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware, routing::get};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use shared::error::ErrorCode;
    use shared::models::Role;
    use tower::ServiceExt;

    fn app(keys: SessionKeys) -> Router {
        let admin = Router::new()
            .route("/admin/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(require(Capability::ManageUsers)));
        let me = Router::new().route(
            "/me",
            get(|caller: Caller| async move { caller.user_id.to_string() }),
        );
        Router::new()
            .merge(admin)
            .merge(me)
            .layer(middleware::from_fn_with_state(keys, resolve_caller))
    }

    async fn call(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut req = http::Request::builder().uri(uri);
        if let Some(t) = token {
            req = req.header(http::header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into()));
        (status, body)
    }

    #[tokio::test]
    async fn test_missing_session_is_401() {
        let keys = SessionKeys::new("gate-test", 1);
        let (status, body) = call(app(keys), "/admin/ping", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], ErrorCode::NotAuthenticated.code());
    }

    #[tokio::test]
    async fn test_employee_on_admin_route_is_403() {
        let keys = SessionKeys::new("gate-test", 1);
        let token = keys.issue(7, "e@example.com", Role::Employee).unwrap();
        let (status, body) = call(app(keys), "/admin/ping", Some(&token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], ErrorCode::PermissionDenied.code());
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let keys = SessionKeys::new("gate-test", 1);
        let token = keys.issue(1, "a@example.com", Role::Admin).unwrap();
        let (status, body) = call(app(keys), "/admin/ping", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_expired_session_is_401() {
        let keys = SessionKeys::new("gate-test", -1);
        let token = keys.issue(1, "a@example.com", Role::Admin).unwrap();
        let (status, body) = call(app(keys), "/admin/ping", Some(&token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], ErrorCode::TokenExpired.code());
    }

    #[tokio::test]
    async fn test_caller_extractor() {
        let keys = SessionKeys::new("gate-test", 1);
        let token = keys.issue(99, "x@example.com", Role::TeamLead).unwrap();
        let (status, body) = call(app(keys), "/me", Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, 99);
    }
}
