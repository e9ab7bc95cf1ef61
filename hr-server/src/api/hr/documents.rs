//! Employee document metadata

use axum::Json;
use axum::extract::{Path, State};
use shared::error::ErrorCode;
use shared::models::{Document, DocumentCreate};
use shared::request::DocumentQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, deleted};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;

/// GET /api/hr/documents?userId=&category=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<DocumentQuery>,
) -> ApiResult<Page> {
    let (documents, total) = db::documents::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "documents",
        documents,
        query.pagination().paginate(total),
    )?))
}

/// POST /api/hr/documents
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(data): ValidJson<DocumentCreate>,
) -> CreatedResult<Document> {
    let document = db::documents::create(&state.pool, &data, caller.user_id).await?;
    created(document)
}

/// DELETE /api/hr/documents/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::documents::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::DocumentNotFound)
}
