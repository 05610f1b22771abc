//! Public announcement listing and the admin announcement payloads.
//!
//! ```text
//! GET /api/announcements
//! ```

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Announcement, AnnouncementDraft, AnnouncementKind, Error, parse_window_bound,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, optional_text, parse_label, require_text};

/// Announcement such as a planned outage.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementView {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "outage")]
    pub kind: String,
    pub service_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<Announcement> for AnnouncementView {
    fn from(value: Announcement) -> Self {
        Self {
            id: *value.id.as_uuid(),
            title: value.title,
            message: value.message,
            kind: value.kind.as_str().to_owned(),
            service_type: value.service_type,
            start_date: value.start_date,
            end_date: value.end_date,
            is_active: value.is_active,
            created_by: value.created_by.map(|id| *id.as_uuid()),
            created_at: value.created_at,
        }
    }
}

/// Body for `POST /api/admin/announcements`.
///
/// Window bounds accept RFC 3339 timestamps or `YYYY-MM-DD` dates (midnight
/// UTC). Omitted bounds leave that side of the window open.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AnnouncementBody {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    #[schema(example = "maintenance")]
    pub kind: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    #[schema(example = "2025-03-01")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

fn window_bound(raw: Option<String>, field: &'static str) -> Result<Option<DateTime<Utc>>, Error> {
    match optional_text(raw) {
        None => Ok(None),
        Some(value) => parse_window_bound(&value).map(Some).ok_or_else(|| {
            Error::invalid_request(format!("{field} must be a date or RFC 3339 timestamp"))
                .with_context(json!({"field": field, "value": value, "code": "invalid_date"}))
        }),
    }
}

impl TryFrom<AnnouncementBody> for AnnouncementDraft {
    type Error = Error;

    fn try_from(value: AnnouncementBody) -> Result<Self, Self::Error> {
        let kind: AnnouncementKind = parse_label(&value.kind, FieldName::new("type"))?;
        Ok(Self {
            title: require_text(&value.title, FieldName::new("title"))?,
            message: require_text(&value.message, FieldName::new("message"))?,
            kind,
            service_type: optional_text(value.service_type),
            start_date: window_bound(value.start_date, "start_date")?,
            end_date: window_bound(value.end_date, "end_date")?,
        })
    }
}

/// Active announcements whose window contains the current time, newest
/// first.
#[utoipa::path(
    get,
    path = "/api/announcements",
    responses(
        (status = 200, description = "Visible announcements", body = [AnnouncementView]),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["announcements"],
    operation_id = "listAnnouncements",
    security([])
)]
#[get("/announcements")]
pub async fn list_announcements(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<AnnouncementView>>> {
    let announcements = state.announcements.list_visible().await?;
    Ok(web::Json(announcements.into_iter().map(Into::into).collect()))
}
