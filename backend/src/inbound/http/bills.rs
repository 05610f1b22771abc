//! Citizen bill handlers.
//!
//! ```text
//! GET /api/bills
//! GET /api/bills/pending
//! GET /api/bills/{id}
//! ```

use actix_web::{get, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{Bill, BillFilter, BillId, FixedPoint};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Utility bill.
#[derive(Debug, Serialize, ToSchema)]
pub struct BillView {
    pub id: Uuid,
    pub citizen_id: Uuid,
    #[schema(example = "electricity")]
    pub service_type: String,
    #[schema(example = "BILL4827103")]
    pub bill_number: String,
    #[schema(example = 1250.5)]
    pub amount: f64,
    pub due_date: NaiveDate,
    #[schema(example = "Jan 2025")]
    pub billing_period: Option<String>,
    /// `pending`, `paid` or `overdue`.
    #[schema(example = "pending")]
    pub status: String,
    pub consumer_number: Option<String>,
    pub meter_reading: Option<f64>,
    pub units_consumed: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<Bill> for BillView {
    fn from(value: Bill) -> Self {
        Self {
            id: *value.id.as_uuid(),
            citizen_id: *value.citizen_id.as_uuid(),
            service_type: value.service_type.as_str().to_owned(),
            bill_number: value.bill_number.into_inner(),
            amount: value.amount.to_f64(),
            due_date: value.due_date,
            billing_period: value.billing_period,
            status: value.status.as_str().to_owned(),
            consumer_number: value.consumer_number,
            meter_reading: value.meter_reading.map(FixedPoint::to_f64),
            units_consumed: value.units_consumed.map(FixedPoint::to_f64),
            created_at: value.created_at,
        }
    }
}

async fn list_filtered(
    state: &HttpState,
    session: &CitizenSession,
    filter: BillFilter,
) -> ApiResult<web::Json<Vec<BillView>>> {
    let bills = state.bills.list_bills(&session.citizen_id(), filter).await?;
    Ok(web::Json(bills.into_iter().map(BillView::from).collect()))
}

/// The caller's bills, earliest due date first.
#[utoipa::path(
    get,
    path = "/api/bills",
    responses(
        (status = 200, description = "Bills", body = [BillView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["bills"],
    operation_id = "listBills"
)]
#[get("/bills")]
pub async fn list_bills(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<BillView>>> {
    list_filtered(&state, &session, BillFilter::All).await
}

/// The caller's pending and overdue bills, earliest due date first.
#[utoipa::path(
    get,
    path = "/api/bills/pending",
    responses(
        (status = 200, description = "Outstanding bills", body = [BillView]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["bills"],
    operation_id = "listPendingBills"
)]
#[get("/bills/pending")]
pub async fn list_pending_bills(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<BillView>>> {
    list_filtered(&state, &session, BillFilter::Outstanding).await
}

/// One of the caller's bills.
#[utoipa::path(
    get,
    path = "/api/bills/{id}",
    params(("id" = Uuid, Path, description = "Bill id")),
    responses(
        (status = 200, description = "Bill", body = BillView),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Bill not found", body = ErrorSchema)
    ),
    tags = ["bills"],
    operation_id = "getBill"
)]
#[get("/bills/{id}")]
pub async fn get_bill(
    state: web::Data<HttpState>,
    session: CitizenSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<BillView>> {
    let id: BillId = parse_id(&path, FieldName::new("id"))?;
    let bill = state.bills.bill(session.principal(), &id).await?;
    Ok(web::Json(bill.into()))
}
