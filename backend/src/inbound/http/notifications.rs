//! Citizen notification handlers.
//!
//! ```text
//! GET /api/notifications
//! PUT /api/notifications/{id}/read
//! ```

use actix_web::{get, put, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::acknowledgement::Acknowledgement;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Notification as seen by one reader.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationView {
    pub id: Uuid,
    /// Absent for broadcasts.
    pub citizen_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "bill_reminder")]
    pub kind: String,
    /// Read state for this reader; broadcasts track it per citizen.
    pub is_read: bool,
    pub target_all: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationView {
    fn from(value: Notification) -> Self {
        Self {
            id: *value.id.as_uuid(),
            citizen_id: value.citizen_id().map(|id| *id.as_uuid()),
            target_all: value.target_all(),
            title: value.title,
            message: value.message,
            kind: value.kind.as_str().to_owned(),
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// The caller's notifications and every broadcast, newest first.
#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Notifications", body = [NotificationView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<NotificationView>>> {
    let notifications = state
        .notifications
        .list_notifications(&session.citizen_id())
        .await?;
    Ok(web::Json(notifications.into_iter().map(Into::into).collect()))
}

/// Mark a notification read. Repeating the call is harmless.
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = Acknowledgement),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Notification not found", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[put("/notifications/{id}/read")]
pub async fn mark_notification_read(
    state: web::Data<HttpState>,
    session: CitizenSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<Acknowledgement>> {
    let id: NotificationId = parse_id(&path, FieldName::new("id"))?;
    state
        .notifications
        .mark_read(&session.citizen_id(), &id)
        .await?;
    Ok(web::Json(Acknowledgement::new("Notification marked as read")))
}
