//! Notification center handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::Notification;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let repos = state.repos();
    let notifications = repos.notifications.list().await?;
    let unread_count = repos.notifications.unread_count().await?;
    Ok(Json(NotificationListResponse {
        notifications,
        unread_count,
    }))
}

/// PUT /api/v1/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.repos().notifications.mark_read(&id).await? {
        return Err(ApiError::NotFound(format!("Notification {} not found", id)));
    }
    state.sync.enqueue_mark_read(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/notifications/read-all
pub async fn mark_all_read(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.repos().notifications.mark_all_read().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/notifications/:id
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.repos().notifications.remove(&id).await? {
        return Err(ApiError::NotFound(format!("Notification {} not found", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
