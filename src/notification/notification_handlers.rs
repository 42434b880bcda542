use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use super::{notification_dto::CreateNotificationRequest, notification_models::Notification};
use crate::{
    error::Result,
    extract::{AppJson, AppPath},
    middleware::AuthUser,
    response::{ok, ApiResponse},
    state::AppState,
};

/// Get the 50 most recent notifications for the authenticated user
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [Notification]),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<Vec<Notification>>>> {
    let notifications = state.notification_service.list(user_id).await?;
    Ok(ok(notifications, "Notifications retrieved successfully"))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification created", body = Notification),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn create_notification(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Notification>>)> {
    payload.validate()?;

    let notification = state.notification_service.create(user_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        ok(notification, "Notification created successfully"),
    ))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Number of unread notifications", body = i64),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<i64>>> {
    let count = state.notification_service.unread_count(user_id).await?;
    Ok(ok(count, "Unread count retrieved successfully"))
}

/// Mark one notification as read
#[utoipa::path(
    post,
    path = "/api/notifications/{id}/mark-read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = bool),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Notification not found")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(notification_id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<bool>>> {
    state
        .notification_service
        .mark_read(user_id, notification_id)
        .await?;
    Ok(ok(true, "Notification marked as read"))
}

/// Mark every unread notification of the caller as read
#[utoipa::path(
    post,
    path = "/api/notifications/mark-all-read",
    responses(
        (status = 200, description = "Number of notifications changed", body = u64),
        (status = 401, description = "Unauthorized")
    ),
    tag = "notifications",
    security(("bearer_auth" = []))
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ApiResponse<u64>>> {
    let changed = state.notification_service.mark_all_read(user_id).await?;
    Ok(ok(changed, "All notifications marked as read"))
}
