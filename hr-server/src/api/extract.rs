//! Request extractors that report failures as `AppError` bodies

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use validator::Validate;

/// JSON body, deserialized and validated before the handler runs
///
/// Malformed JSON is `InvalidRequest` (400); failed field validation is
/// `ValidationFailed` (400) with `details.fields`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, rejection.body_text())
}

/// Query string with `AppError` rejections
#[derive(Debug, Clone, Copy, Default)]
pub struct ListQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ListQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;
        Ok(Self(value))
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::with_message(ErrorCode::InvalidFormat, rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, routing::{get, post}};
    use http::StatusCode;
    use http_body_util::BodyExt;
    use shared::models::LeaveCreate;
    use shared::request::LeaveQuery;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/leaves",
                post(|ValidJson(body): ValidJson<LeaveCreate>| async move { body.reason }),
            )
            .route(
                "/leaves",
                get(|ListQuery(q): ListQuery<LeaveQuery>| async move {
                    q.pagination().limit().to_string()
                }),
            )
    }

    async fn post_json(body: &str) -> (StatusCode, serde_json::Value) {
        let req = http::Request::builder()
            .method("POST")
            .uri("/leaves")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or_default())
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let (status, _) = post_json(
            r#"{"type":"annual","startDate":"2023-04-15","endDate":"2023-04-20","reason":"trip"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let (status, body) = post_json(r#"{"type":"annual""#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::InvalidRequest.code());
    }

    #[tokio::test]
    async fn test_validation_failure_lists_fields() {
        let (status, body) = post_json(
            r#"{"type":"annual","startDate":"2023-04-15","endDate":"2023-04-20","reason":""}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], ErrorCode::ValidationFailed.code());
        assert!(body["details"]["fields"]["reason"].is_array());
    }

    #[tokio::test]
    async fn test_bad_query_is_400() {
        let req = http::Request::builder()
            .uri("/leaves?status=maybe")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = http::Request::builder()
            .uri("/leaves?limit=7")
            .body(Body::empty())
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"7");
    }
}
