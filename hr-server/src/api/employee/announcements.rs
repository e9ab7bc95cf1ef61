//! Company announcements

use axum::Json;
use axum::extract::{Path, State};
use shared::error::ErrorCode;
use shared::models::{Announcement, AnnouncementCreate};
use shared::request::AnnouncementQuery;

use crate::api::extract::{ListQuery, ValidJson};
use crate::api::{ApiResult, CreatedResult, Page, created, deleted, found};
use crate::auth::Caller;
use crate::db;
use crate::state::AppState;
use crate::util::today;

/// GET /api/employee/announcements?category=&important=
pub async fn list(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<AnnouncementQuery>,
) -> ApiResult<Page> {
    let (announcements, total) = db::announcements::list(&state.pool, &query).await?;
    Ok(Json(Page::new(
        "announcements",
        announcements,
        query.pagination().paginate(total),
    )?))
}

/// POST /api/employee/announcements
///
/// The author is the caller's display name; the date defaults to today.
pub async fn create(
    State(state): State<AppState>,
    caller: Caller,
    ValidJson(data): ValidJson<AnnouncementCreate>,
) -> CreatedResult<Announcement> {
    let author = found(
        db::users::find_by_id(&state.pool, caller.user_id).await?,
        ErrorCode::UserNotFound,
    )?;
    let date = data.date.unwrap_or_else(|| today(state.workday.timezone));
    let announcement =
        db::announcements::create(&state.pool, &data, date, &author.name, caller.user_id).await?;
    tracing::info!(announcement_id = announcement.id, by = caller.user_id, "Announcement published");
    created(announcement)
}

/// DELETE /api/employee/announcements/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let removed = db::announcements::delete(&state.pool, id).await?;
    deleted(id, removed, ErrorCode::AnnouncementNotFound)
}
