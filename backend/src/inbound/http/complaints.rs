//! Citizen complaint handlers.
//!
//! ```text
//! POST /api/complaints {"category":"water","description":"leak"}
//! GET  /api/complaints
//! GET  /api/complaints/{id}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Complaint, ComplaintCategory, ComplaintDraft, ComplaintId, Error, Priority};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, optional_text, parse_id, parse_label};

/// Complaint as seen by its citizen.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintView {
    pub id: Uuid,
    pub citizen_id: Uuid,
    #[schema(example = "water")]
    pub category: String,
    pub subcategory: Option<String>,
    pub description: String,
    pub location: Option<String>,
    /// Photo reference supplied by the client.
    pub photo: Option<String>,
    #[schema(example = "submitted")]
    pub status: String,
    #[schema(example = "CMP1294837")]
    pub complaint_number: String,
    #[schema(example = "medium")]
    pub priority: String,
    pub resolution_remarks: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Complaint> for ComplaintView {
    fn from(value: Complaint) -> Self {
        Self {
            id: *value.id.as_uuid(),
            citizen_id: *value.citizen_id.as_uuid(),
            category: value.category.as_str().to_owned(),
            subcategory: value.subcategory,
            description: value.description,
            location: value.location,
            photo: value.photo,
            status: value.status.as_str().to_owned(),
            complaint_number: value.complaint_number.into_inner(),
            priority: value.priority.as_str().to_owned(),
            resolution_remarks: value.resolution_remarks,
            resolved_at: value.resolved_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Body for `POST /api/complaints`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ComplaintBody {
    #[schema(example = "water")]
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[schema(example = "Pipe leaking near the main gate")]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Defaults to `medium`.
    #[serde(default)]
    pub priority: Option<String>,
}

impl TryFrom<ComplaintBody> for ComplaintDraft {
    type Error = Error;

    fn try_from(value: ComplaintBody) -> Result<Self, Self::Error> {
        let category: ComplaintCategory =
            parse_label(&value.category, FieldName::new("category"))?;
        let priority = match optional_text(value.priority) {
            Some(raw) => parse_label::<Priority>(&raw, FieldName::new("priority"))?,
            None => Priority::default(),
        };
        Ok(Self {
            category,
            subcategory: optional_text(value.subcategory),
            description: value.description.trim().to_owned(),
            location: optional_text(value.location),
            photo: optional_text(value.photo),
            priority,
        })
    }
}

/// Response for `POST /api/complaints`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintReceipt {
    pub success: bool,
    pub complaint_id: Uuid,
    pub complaint_number: String,
    #[schema(example = "Complaint filed successfully")]
    pub message: String,
}

/// File a complaint.
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = ComplaintBody,
    responses(
        (status = 200, description = "Complaint filed", body = ComplaintReceipt),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "fileComplaint"
)]
#[post("/complaints")]
pub async fn file_complaint(
    state: web::Data<HttpState>,
    session: CitizenSession,
    payload: web::Json<ComplaintBody>,
) -> ApiResult<web::Json<ComplaintReceipt>> {
    let draft = ComplaintDraft::try_from(payload.into_inner())?;
    let complaint = state.complaints.file(&session.citizen_id(), draft).await?;
    Ok(web::Json(ComplaintReceipt {
        success: true,
        complaint_id: *complaint.id.as_uuid(),
        complaint_number: complaint.complaint_number.into_inner(),
        message: "Complaint filed successfully".to_owned(),
    }))
}

/// The caller's complaints, newest first.
#[utoipa::path(
    get,
    path = "/api/complaints",
    responses(
        (status = 200, description = "Complaints", body = [ComplaintView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<ComplaintView>>> {
    let complaints = state
        .complaints
        .list_complaints(&session.citizen_id())
        .await?;
    Ok(web::Json(complaints.into_iter().map(Into::into).collect()))
}

/// One of the caller's complaints.
#[utoipa::path(
    get,
    path = "/api/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint id")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintView),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "getComplaint"
)]
#[get("/complaints/{id}")]
pub async fn get_complaint(
    state: web::Data<HttpState>,
    session: CitizenSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComplaintView>> {
    let id: ComplaintId = parse_id(&path, FieldName::new("id"))?;
    let complaint = state.complaints.complaint(session.principal(), &id).await?;
    Ok(web::Json(complaint.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn body(priority: Option<&str>) -> ComplaintBody {
        ComplaintBody {
            category: "water".into(),
            subcategory: None,
            description: "  leak ".into(),
            location: Some("Ward 4".into()),
            photo: Some(String::new()),
            priority: priority.map(str::to_owned),
        }
    }

    #[rstest]
    #[case(None, Priority::Medium)]
    #[case(Some(""), Priority::Medium)]
    #[case(Some("urgent"), Priority::Urgent)]
    fn priority_defaults_to_medium(#[case] raw: Option<&str>, #[case] expected: Priority) {
        let draft = ComplaintDraft::try_from(body(raw)).expect("valid body");
        assert_eq!(draft.priority, expected);
        assert_eq!(draft.description, "leak");
        assert_eq!(draft.photo, None);
    }

    #[rstest]
    fn unknown_priority_is_rejected() {
        let err = ComplaintDraft::try_from(body(Some("whenever"))).expect_err("rejected");
        assert_eq!(err.context().expect("context")["field"], "priority");
    }

    #[rstest]
    fn unknown_category_is_rejected() {
        let mut raw = body(None);
        raw.category = "noise".into();
        let err = ComplaintDraft::try_from(raw).expect_err("rejected");
        assert_eq!(err.context().expect("context")["field"], "category");
    }
}
