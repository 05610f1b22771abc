//! Citizen service-request handlers.
//!
//! ```text
//! POST /api/service-requests {"request_type":"new_connection","service_type":"water"}
//! GET  /api/service-requests
//! GET  /api/service-requests/{id}
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Error, RequestType, ServiceRequest, ServiceRequestDraft, ServiceRequestId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, optional_text, parse_id, parse_label, require_text,
};

/// Service request as seen by its citizen.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceRequestView {
    pub id: Uuid,
    pub citizen_id: Uuid,
    #[schema(example = "new_connection")]
    pub request_type: String,
    #[schema(example = "water")]
    pub service_type: String,
    pub description: Option<String>,
    #[schema(example = "submitted")]
    pub status: String,
    #[schema(example = "SR5829104")]
    pub acknowledgment_number: String,
    pub documents: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServiceRequest> for ServiceRequestView {
    fn from(value: ServiceRequest) -> Self {
        Self {
            id: *value.id.as_uuid(),
            citizen_id: *value.citizen_id.as_uuid(),
            request_type: value.request_type.as_str().to_owned(),
            service_type: value.service_type,
            description: value.description,
            status: value.status.as_str().to_owned(),
            acknowledgment_number: value.acknowledgment_number.into_inner(),
            documents: value.documents,
            remarks: value.remarks,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Body for `POST /api/service-requests`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceRequestBody {
    #[schema(example = "new_connection")]
    pub request_type: String,
    #[schema(example = "water")]
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form document references.
    #[serde(default)]
    pub documents: Option<String>,
}

impl TryFrom<ServiceRequestBody> for ServiceRequestDraft {
    type Error = Error;

    fn try_from(value: ServiceRequestBody) -> Result<Self, Self::Error> {
        let request_type: RequestType =
            parse_label(&value.request_type, FieldName::new("request_type"))?;
        Ok(Self {
            request_type,
            service_type: require_text(&value.service_type, FieldName::new("service_type"))?,
            description: optional_text(value.description),
            documents: optional_text(value.documents),
        })
    }
}

/// Response for `POST /api/service-requests`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceRequestReceipt {
    pub success: bool,
    pub request_id: Uuid,
    pub acknowledgment_number: String,
    #[schema(example = "Service request submitted successfully")]
    pub message: String,
}

/// File a service request.
#[utoipa::path(
    post,
    path = "/api/service-requests",
    request_body = ServiceRequestBody,
    responses(
        (status = 200, description = "Request filed", body = ServiceRequestReceipt),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "submitServiceRequest"
)]
#[post("/service-requests")]
pub async fn submit_service_request(
    state: web::Data<HttpState>,
    session: CitizenSession,
    payload: web::Json<ServiceRequestBody>,
) -> ApiResult<web::Json<ServiceRequestReceipt>> {
    let draft = ServiceRequestDraft::try_from(payload.into_inner())?;
    let request = state
        .service_requests
        .submit(&session.citizen_id(), draft)
        .await?;
    Ok(web::Json(ServiceRequestReceipt {
        success: true,
        request_id: *request.id.as_uuid(),
        acknowledgment_number: request.acknowledgment_number.into_inner(),
        message: "Service request submitted successfully".to_owned(),
    }))
}

/// The caller's service requests, newest first.
#[utoipa::path(
    get,
    path = "/api/service-requests",
    responses(
        (status = 200, description = "Service requests", body = [ServiceRequestView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "listServiceRequests"
)]
#[get("/service-requests")]
pub async fn list_service_requests(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<ServiceRequestView>>> {
    let requests = state
        .service_requests
        .list_requests(&session.citizen_id())
        .await?;
    Ok(web::Json(requests.into_iter().map(Into::into).collect()))
}

/// One of the caller's service requests.
#[utoipa::path(
    get,
    path = "/api/service-requests/{id}",
    params(("id" = Uuid, Path, description = "Service request id")),
    responses(
        (status = 200, description = "Service request", body = ServiceRequestView),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Service request not found", body = ErrorSchema)
    ),
    tags = ["service-requests"],
    operation_id = "getServiceRequest"
)]
#[get("/service-requests/{id}")]
pub async fn get_service_request(
    state: web::Data<HttpState>,
    session: CitizenSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<ServiceRequestView>> {
    let id: ServiceRequestId = parse_id(&path, FieldName::new("id"))?;
    let request = state
        .service_requests
        .request(session.principal(), &id)
        .await?;
    Ok(web::Json(request.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CitizenId, Principal, ReferenceCode, ServiceRequestStatus};
    use crate::inbound::http::test_utils::{TestPorts, gate_resolving};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn post(ports: TestPorts, body: Value) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            ports.into_app().service(
                web::scope("/api")
                    .service(submit_service_request)
                    .service(get_service_request),
            ),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/api/service-requests")
            .insert_header(("Authorization", "Bearer token"))
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn submission_returns_acknowledgment() {
        let id = CitizenId::random();
        let mut ports = TestPorts::default();
        ports.auth = gate_resolving(Principal::citizen(id));
        ports
            .service_requests
            .expect_submit()
            .withf(|_, draft| {
                draft.request_type == RequestType::MeterReading
                    && draft.service_type == "electricity"
                    && draft.description.is_none()
            })
            .times(1)
            .returning(|citizen, draft| {
                Ok(draft.into_request(
                    ServiceRequestId::random(),
                    *citizen,
                    ReferenceCode::from_stored("SR5829104"),
                    Utc::now(),
                ))
            });
        let (status, body) = post(
            ports,
            json!({"request_type": "meter_reading", "service_type": "electricity", "description": " "}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["acknowledgment_number"], "SR5829104");
        assert_eq!(body["message"], "Service request submitted successfully");
    }

    #[rstest]
    #[case(json!({"request_type": "teleport", "service_type": "water"}), "request_type")]
    #[case(json!({"request_type": "new_connection", "service_type": "  "}), "service_type")]
    #[actix_web::test]
    async fn invalid_submissions_name_the_field(#[case] body: Value, #[case] field: &str) {
        let mut ports = TestPorts::default();
        ports.auth = gate_resolving(Principal::citizen(CitizenId::random()));
        ports.service_requests.expect_submit().never();
        let (status, body) = post(ports, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["context"]["field"], field);
    }

    #[test]
    fn status_label_is_rendered() {
        let request = ServiceRequest {
            id: ServiceRequestId::random(),
            citizen_id: CitizenId::random(),
            request_type: RequestType::AddressChange,
            service_type: "gas".into(),
            description: None,
            status: ServiceRequestStatus::UnderReview,
            acknowledgment_number: ReferenceCode::from_stored("SR00000001"),
            documents: None,
            remarks: Some("site visit booked".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let view = ServiceRequestView::from(request);
        assert_eq!(view.status, "under_review");
        assert_eq!(view.request_type, "address_change");
    }
}
