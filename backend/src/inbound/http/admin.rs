//! Administrator handlers.
//!
//! ```text
//! GET    /api/admin/dashboard
//! GET    /api/admin/citizens
//! GET    /api/admin/bills
//! POST   /api/admin/bills
//! GET    /api/admin/payments
//! GET    /api/admin/complaints
//! PUT    /api/admin/complaints/{id}
//! GET    /api/admin/service-requests
//! PUT    /api/admin/service-requests/{id}
//! GET    /api/admin/announcements
//! POST   /api/admin/announcements
//! DELETE /api/admin/announcements/{id}
//! POST   /api/admin/notifications
//! ```
//!
//! Every handler takes an [`AdminSession`], so a citizen token yields `403`.

use actix_web::{delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AnnouncementDraft, AnnouncementId, Audience, BillDraft, BillWithCitizen, CitizenId,
    CitizenSummary, ComplaintId, ComplaintStatus, ComplaintWithCitizen, DashboardSummary, Error,
    NotificationDraft, NotificationKind, PaymentDetails, ServiceRequestId, ServiceRequestStatus,
    ServiceRequestWithCitizen, ServiceType,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::acknowledgement::Acknowledgement;
use crate::inbound::http::announcements::{AnnouncementBody, AnnouncementView};
use crate::inbound::http::auth::AdminSession;
use crate::inbound::http::bills::BillView;
use crate::inbound::http::citizen::CitizenView;
use crate::inbound::http::complaints::ComplaintView;
use crate::inbound::http::payments::{PaymentHistoryEntry, history_entry};
use crate::inbound::http::service_requests::ServiceRequestView;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, optional_text, parse_date, parse_id, parse_label, parse_quantity, require_text,
};

/// Citizen columns appended to admin listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct CitizenColumns {
    pub citizen_name: Option<String>,
    pub citizen_mobile: Option<String>,
}

impl From<CitizenSummary> for CitizenColumns {
    fn from(value: CitizenSummary) -> Self {
        Self {
            citizen_name: value.name,
            citizen_mobile: value.mobile,
        }
    }
}

/// Bill with its citizen's name and mobile.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminBillView {
    #[serde(flatten)]
    pub bill: BillView,
    #[serde(flatten)]
    pub citizen: CitizenColumns,
}

impl From<BillWithCitizen> for AdminBillView {
    fn from(value: BillWithCitizen) -> Self {
        Self {
            bill: value.bill.into(),
            citizen: value.citizen.into(),
        }
    }
}

/// Payment with its bill and payer.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPaymentView {
    #[serde(flatten)]
    pub payment: PaymentHistoryEntry,
    #[serde(flatten)]
    pub citizen: CitizenColumns,
}

impl From<PaymentDetails> for AdminPaymentView {
    fn from(value: PaymentDetails) -> Self {
        let (payment, _, payer) = history_entry(value);
        Self {
            payment,
            citizen: CitizenColumns {
                citizen_name: payer.name,
                citizen_mobile: payer.mobile,
            },
        }
    }
}

/// Complaint with its citizen's name and mobile.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminComplaintView {
    #[serde(flatten)]
    pub complaint: ComplaintView,
    #[serde(flatten)]
    pub citizen: CitizenColumns,
}

impl From<ComplaintWithCitizen> for AdminComplaintView {
    fn from(value: ComplaintWithCitizen) -> Self {
        Self {
            complaint: value.complaint.into(),
            citizen: value.citizen.into(),
        }
    }
}

/// Service request with its citizen's name and mobile.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminServiceRequestView {
    #[serde(flatten)]
    pub request: ServiceRequestView,
    #[serde(flatten)]
    pub citizen: CitizenColumns,
}

impl From<ServiceRequestWithCitizen> for AdminServiceRequestView {
    fn from(value: ServiceRequestWithCitizen) -> Self {
        Self {
            request: value.request.into(),
            citizen: value.citizen.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalCount {
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillCounts {
    pub total: u64,
    pub pending: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentCounts {
    pub total: u64,
    /// Sum of recorded payments in rupees.
    pub revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintCounts {
    pub total: u64,
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
}

/// Aggregate counts for the admin dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardView {
    pub citizens: TotalCount,
    pub bills: BillCounts,
    pub payments: PaymentCounts,
    pub complaints: ComplaintCounts,
    pub service_requests: BillCounts,
}

impl From<DashboardSummary> for DashboardView {
    fn from(value: DashboardSummary) -> Self {
        Self {
            citizens: TotalCount {
                total: value.citizens_total,
            },
            bills: BillCounts {
                total: value.bills_total,
                pending: value.bills_pending,
            },
            payments: PaymentCounts {
                total: value.payments_total,
                revenue: value.payments_revenue.to_f64(),
            },
            complaints: ComplaintCounts {
                total: value.complaints_total,
                pending: value.complaints_pending,
                in_progress: value.complaints_in_progress,
                resolved: value.complaints_resolved,
            },
            service_requests: BillCounts {
                total: value.service_requests_total,
                pending: value.service_requests_pending,
            },
        }
    }
}

/// Body for `POST /api/admin/bills`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BillBody {
    pub citizen_id: String,
    #[schema(example = "electricity")]
    pub service_type: String,
    #[schema(example = 1250.5)]
    pub amount: f64,
    #[schema(example = "2025-02-15")]
    pub due_date: String,
    #[serde(default)]
    pub billing_period: Option<String>,
    #[serde(default)]
    pub consumer_number: Option<String>,
    #[serde(default)]
    pub meter_reading: Option<f64>,
    #[serde(default)]
    pub units_consumed: Option<f64>,
}

impl TryFrom<BillBody> for BillDraft {
    type Error = Error;

    fn try_from(value: BillBody) -> Result<Self, Self::Error> {
        let service_type: ServiceType =
            parse_label(&value.service_type, FieldName::new("service_type"))?;
        Ok(Self {
            citizen_id: parse_id(&value.citizen_id, FieldName::new("citizen_id"))?,
            service_type,
            amount: parse_quantity(value.amount, FieldName::new("amount"))?,
            due_date: parse_date(&value.due_date, FieldName::new("due_date"))?,
            billing_period: optional_text(value.billing_period),
            consumer_number: optional_text(value.consumer_number),
            meter_reading: value
                .meter_reading
                .map(|raw| parse_quantity(raw, FieldName::new("meter_reading")))
                .transpose()?,
            units_consumed: value
                .units_consumed
                .map(|raw| parse_quantity(raw, FieldName::new("units_consumed")))
                .transpose()?,
        })
    }
}

/// Response for `POST /api/admin/bills`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BillCreated {
    pub success: bool,
    pub bill_id: Uuid,
    pub bill_number: String,
    #[schema(example = "Bill created successfully")]
    pub message: String,
}

/// Body for `PUT /api/admin/complaints/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ComplaintStatusBody {
    #[schema(example = "resolved")]
    pub status: String,
    #[serde(default)]
    pub resolution_remarks: Option<String>,
}

/// Body for `PUT /api/admin/service-requests/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ServiceRequestStatusBody {
    #[schema(example = "approved")]
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Response for `POST /api/admin/announcements`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnnouncementCreated {
    pub success: bool,
    pub announcement_id: Uuid,
    #[schema(example = "Announcement created successfully")]
    pub message: String,
}

/// Body for `POST /api/admin/notifications`.
///
/// Without `citizen_id` the notification is broadcast to every citizen.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct NotificationBody {
    #[serde(default)]
    pub citizen_id: Option<String>,
    pub title: String,
    pub message: String,
    /// Defaults to `notice`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl TryFrom<NotificationBody> for NotificationDraft {
    type Error = Error;

    fn try_from(value: NotificationBody) -> Result<Self, Self::Error> {
        let audience = match optional_text(value.citizen_id) {
            Some(raw) => Audience::Citizen(parse_id::<CitizenId>(&raw, FieldName::new("citizen_id"))?),
            None => Audience::Everyone,
        };
        let kind = match optional_text(value.kind) {
            Some(raw) => parse_label::<NotificationKind>(&raw, FieldName::new("type"))?,
            None => NotificationKind::Notice,
        };
        Ok(Self {
            audience,
            title: require_text(&value.title, FieldName::new("title"))?,
            message: require_text(&value.message, FieldName::new("message"))?,
            kind,
        })
    }
}

/// Response for `POST /api/admin/notifications`.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSent {
    pub success: bool,
    pub notification_id: Uuid,
    pub target_all: bool,
    #[schema(example = "Notification sent successfully")]
    pub message: String,
}

/// Aggregate counts across every citizen.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<DashboardView>> {
    let summary = state.dashboard.summary().await?;
    Ok(web::Json(summary.into()))
}

/// Every citizen account, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/citizens",
    responses(
        (status = 200, description = "Citizens", body = [CitizenView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListCitizens"
)]
#[get("/admin/citizens")]
pub async fn list_citizens(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<CitizenView>>> {
    let citizens = state.citizens.list_citizens().await?;
    Ok(web::Json(citizens.into_iter().map(Into::into).collect()))
}

/// Every bill with citizen name and mobile, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/bills",
    responses(
        (status = 200, description = "Bills", body = [AdminBillView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListBills"
)]
#[get("/admin/bills")]
pub async fn list_all_bills(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<AdminBillView>>> {
    let bills = state.bills.list_all_bills().await?;
    Ok(web::Json(bills.into_iter().map(Into::into).collect()))
}

/// Raise a bill against a citizen.
#[utoipa::path(
    post,
    path = "/api/admin/bills",
    request_body = BillBody,
    responses(
        (status = 200, description = "Bill created", body = BillCreated),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Citizen not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminCreateBill"
)]
#[post("/admin/bills")]
pub async fn create_bill(
    state: web::Data<HttpState>,
    _session: AdminSession,
    payload: web::Json<BillBody>,
) -> ApiResult<web::Json<BillCreated>> {
    let draft = BillDraft::try_from(payload.into_inner())?;
    let bill = state.bills.create_bill(draft).await?;
    Ok(web::Json(BillCreated {
        success: true,
        bill_id: *bill.id.as_uuid(),
        bill_number: bill.bill_number.into_inner(),
        message: "Bill created successfully".to_owned(),
    }))
}

/// Every payment with bill and payer details, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/payments",
    responses(
        (status = 200, description = "Payments", body = [AdminPaymentView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListPayments"
)]
#[get("/admin/payments")]
pub async fn list_all_payments(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<AdminPaymentView>>> {
    let payments = state.payments.list_all_payments().await?;
    Ok(web::Json(payments.into_iter().map(Into::into).collect()))
}

/// Every complaint with citizen name and mobile, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/complaints",
    responses(
        (status = 200, description = "Complaints", body = [AdminComplaintView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListComplaints"
)]
#[get("/admin/complaints")]
pub async fn list_all_complaints(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<AdminComplaintView>>> {
    let complaints = state.complaints.list_all_complaints().await?;
    Ok(web::Json(complaints.into_iter().map(Into::into).collect()))
}

/// Move a complaint to a new status, replacing its resolution remarks.
///
/// Moving to `resolved` stamps `resolved_at`; any other status clears it.
#[utoipa::path(
    put,
    path = "/api/admin/complaints/{id}",
    params(("id" = Uuid, Path, description = "Complaint id")),
    request_body = ComplaintStatusBody,
    responses(
        (status = 200, description = "Complaint updated", body = Acknowledgement),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateComplaint"
)]
#[put("/admin/complaints/{id}")]
pub async fn update_complaint(
    state: web::Data<HttpState>,
    session: AdminSession,
    path: web::Path<String>,
    payload: web::Json<ComplaintStatusBody>,
) -> ApiResult<web::Json<Acknowledgement>> {
    let id: ComplaintId = parse_id(&path, FieldName::new("id"))?;
    let body = payload.into_inner();
    let status: ComplaintStatus = parse_label(&body.status, FieldName::new("status"))?;
    state
        .complaints
        .update_status(
            session.principal(),
            &id,
            status,
            optional_text(body.resolution_remarks),
        )
        .await?;
    Ok(web::Json(Acknowledgement::new("Complaint updated successfully")))
}

/// Every service request with citizen name and mobile, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/service-requests",
    responses(
        (status = 200, description = "Service requests", body = [AdminServiceRequestView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListServiceRequests"
)]
#[get("/admin/service-requests")]
pub async fn list_all_service_requests(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<AdminServiceRequestView>>> {
    let requests = state.service_requests.list_all_requests().await?;
    Ok(web::Json(requests.into_iter().map(Into::into).collect()))
}

/// Move a service request to a new status, replacing its remarks.
#[utoipa::path(
    put,
    path = "/api/admin/service-requests/{id}",
    params(("id" = Uuid, Path, description = "Service request id")),
    request_body = ServiceRequestStatusBody,
    responses(
        (status = 200, description = "Service request updated", body = Acknowledgement),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Service request not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUpdateServiceRequest"
)]
#[put("/admin/service-requests/{id}")]
pub async fn update_service_request(
    state: web::Data<HttpState>,
    session: AdminSession,
    path: web::Path<String>,
    payload: web::Json<ServiceRequestStatusBody>,
) -> ApiResult<web::Json<Acknowledgement>> {
    let id: ServiceRequestId = parse_id(&path, FieldName::new("id"))?;
    let body = payload.into_inner();
    let status: ServiceRequestStatus = parse_label(&body.status, FieldName::new("status"))?;
    state
        .service_requests
        .update_status(session.principal(), &id, status, optional_text(body.remarks))
        .await?;
    Ok(web::Json(Acknowledgement::new(
        "Service request updated successfully",
    )))
}

/// Every announcement, including inactive and out-of-window ones.
#[utoipa::path(
    get,
    path = "/api/admin/announcements",
    responses(
        (status = 200, description = "Announcements", body = [AnnouncementView]),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListAnnouncements"
)]
#[get("/admin/announcements")]
pub async fn list_all_announcements(
    state: web::Data<HttpState>,
    _session: AdminSession,
) -> ApiResult<web::Json<Vec<AnnouncementView>>> {
    let announcements = state.announcements.list_all_announcements().await?;
    Ok(web::Json(announcements.into_iter().map(Into::into).collect()))
}

/// Publish an announcement authored by the caller.
#[utoipa::path(
    post,
    path = "/api/admin/announcements",
    request_body = AnnouncementBody,
    responses(
        (status = 200, description = "Announcement created", body = AnnouncementCreated),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminCreateAnnouncement"
)]
#[post("/admin/announcements")]
pub async fn create_announcement(
    state: web::Data<HttpState>,
    session: AdminSession,
    payload: web::Json<AnnouncementBody>,
) -> ApiResult<web::Json<AnnouncementCreated>> {
    let draft = AnnouncementDraft::try_from(payload.into_inner())?;
    let announcement = state
        .announcements
        .create(&session.admin_id(), draft)
        .await?;
    Ok(web::Json(AnnouncementCreated {
        success: true,
        announcement_id: *announcement.id.as_uuid(),
        message: "Announcement created successfully".to_owned(),
    }))
}

/// Withdraw an announcement. The record is kept but no longer listed
/// publicly.
#[utoipa::path(
    delete,
    path = "/api/admin/announcements/{id}",
    params(("id" = Uuid, Path, description = "Announcement id")),
    responses(
        (status = 200, description = "Announcement withdrawn", body = Acknowledgement),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Announcement not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteAnnouncement"
)]
#[delete("/admin/announcements/{id}")]
pub async fn delete_announcement(
    state: web::Data<HttpState>,
    _session: AdminSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<Acknowledgement>> {
    let id: AnnouncementId = parse_id(&path, FieldName::new("id"))?;
    state.announcements.deactivate(&id).await?;
    Ok(web::Json(Acknowledgement::new(
        "Announcement deleted successfully",
    )))
}

/// Notify one citizen, or every citizen when no `citizen_id` is given.
#[utoipa::path(
    post,
    path = "/api/admin/notifications",
    request_body = NotificationBody,
    responses(
        (status = 200, description = "Notification sent", body = NotificationSent),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Citizen not found", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminSendNotification"
)]
#[post("/admin/notifications")]
pub async fn send_notification(
    state: web::Data<HttpState>,
    _session: AdminSession,
    payload: web::Json<NotificationBody>,
) -> ApiResult<web::Json<NotificationSent>> {
    let draft = NotificationDraft::try_from(payload.into_inner())?;
    let notification = state.notifications.send(draft).await?;
    Ok(web::Json(NotificationSent {
        success: true,
        notification_id: *notification.id.as_uuid(),
        target_all: notification.target_all(),
        message: "Notification sent successfully".to_owned(),
    }))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
