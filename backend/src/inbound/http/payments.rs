//! Citizen payment handlers.
//!
//! ```text
//! POST /api/payments {"bill_id":"…","payment_method":"upi"}
//! GET  /api/payments
//! GET  /api/payments/{id}/receipt
//! ```

use actix_web::{get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::PaymentRequest;
use crate::domain::{Error, Payment, PaymentDetails, PaymentId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::auth::CitizenSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require_text};

/// Stored payment.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentView {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub bill_id: Uuid,
    #[schema(example = 1250.5)]
    pub amount: f64,
    #[schema(example = "upi")]
    pub payment_method: String,
    #[schema(example = "TXN482910335")]
    pub transaction_id: String,
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "RCP160425")]
    pub receipt_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentView {
    fn from(value: Payment) -> Self {
        Self {
            id: *value.id.as_uuid(),
            citizen_id: *value.citizen_id.as_uuid(),
            bill_id: *value.bill_id.as_uuid(),
            amount: value.amount.to_f64(),
            payment_method: value.payment_method,
            transaction_id: value.transaction_id.into_inner(),
            status: value.status.as_str().to_owned(),
            receipt_number: value.receipt_number.into_inner(),
            created_at: value.created_at,
        }
    }
}

/// Payment with the bill it settled.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentHistoryEntry {
    #[serde(flatten)]
    pub payment: PaymentView,
    pub service_type: Option<String>,
    pub bill_number: Option<String>,
    pub billing_period: Option<String>,
}

/// Receipt: payment, bill and payer details.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentReceipt {
    #[serde(flatten)]
    pub entry: PaymentHistoryEntry,
    pub consumer_number: Option<String>,
    pub name: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
}

/// Split joined details into the history view and the remaining parts.
pub(crate) fn history_entry(
    details: PaymentDetails,
) -> (PaymentHistoryEntry, Option<String>, PaymentDetailsRest) {
    let PaymentDetails {
        payment,
        bill,
        citizen,
        citizen_address,
    } = details;
    let (service_type, bill_number, billing_period, consumer_number) = match bill {
        Some(summary) => (
            Some(summary.service_type.as_str().to_owned()),
            Some(summary.bill_number.into_inner()),
            summary.billing_period,
            summary.consumer_number,
        ),
        None => (None, None, None, None),
    };
    let entry = PaymentHistoryEntry {
        payment: payment.into(),
        service_type,
        bill_number,
        billing_period,
    };
    let rest = PaymentDetailsRest {
        name: citizen.as_ref().and_then(|c| c.name.clone()),
        mobile: citizen.and_then(|c| c.mobile),
        address: citizen_address,
    };
    (entry, consumer_number, rest)
}

/// Payer fields left over once the history view is built.
pub(crate) struct PaymentDetailsRest {
    pub(crate) name: Option<String>,
    pub(crate) mobile: Option<String>,
    pub(crate) address: Option<String>,
}

impl From<PaymentDetails> for PaymentHistoryEntry {
    fn from(value: PaymentDetails) -> Self {
        history_entry(value).0
    }
}

impl From<PaymentDetails> for PaymentReceipt {
    fn from(value: PaymentDetails) -> Self {
        let (entry, consumer_number, rest) = history_entry(value);
        Self {
            entry,
            consumer_number,
            name: rest.name,
            mobile: rest.mobile,
            address: rest.address,
        }
    }
}

/// Body for `POST /api/payments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PayBillRequest {
    pub bill_id: String,
    #[schema(example = "upi")]
    pub payment_method: String,
}

impl TryFrom<PayBillRequest> for PaymentRequest {
    type Error = Error;

    fn try_from(value: PayBillRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            bill_id: parse_id(&value.bill_id, FieldName::new("bill_id"))?,
            payment_method: require_text(&value.payment_method, FieldName::new("payment_method"))?,
        })
    }
}

/// Response for `POST /api/payments`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentConfirmation {
    pub success: bool,
    pub payment_id: Uuid,
    pub transaction_id: String,
    pub receipt_number: String,
    pub amount: f64,
    #[schema(example = "Payment successful")]
    pub message: String,
}

/// Pay one of the caller's bills through the mock gateway.
///
/// The bill is marked paid atomically with the payment being recorded; a
/// second attempt on the same bill fails with `invalid_state`.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = PayBillRequest,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentConfirmation),
        (status = 400, description = "Invalid request or bill already paid", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Bill not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "payBill"
)]
#[post("/payments")]
pub async fn pay_bill(
    state: web::Data<HttpState>,
    session: CitizenSession,
    payload: web::Json<PayBillRequest>,
) -> ApiResult<web::Json<PaymentConfirmation>> {
    let request = PaymentRequest::try_from(payload.into_inner())?;
    let payment = state.payments.pay(&session.citizen_id(), request).await?;
    Ok(web::Json(PaymentConfirmation {
        success: true,
        payment_id: *payment.id.as_uuid(),
        transaction_id: payment.transaction_id.into_inner(),
        receipt_number: payment.receipt_number.into_inner(),
        amount: payment.amount.to_f64(),
        message: "Payment successful".to_owned(),
    }))
}

/// The caller's payments, newest first.
#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "Payment history", body = [PaymentHistoryEntry]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    session: CitizenSession,
) -> ApiResult<web::Json<Vec<PaymentHistoryEntry>>> {
    let history = state.payments.history(&session.citizen_id()).await?;
    Ok(web::Json(history.into_iter().map(Into::into).collect()))
}

/// Receipt for one of the caller's payments.
#[utoipa::path(
    get,
    path = "/api/payments/{id}/receipt",
    params(("id" = Uuid, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Receipt", body = PaymentReceipt),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Receipt not found", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "getReceipt"
)]
#[get("/payments/{id}/receipt")]
pub async fn get_receipt(
    state: web::Data<HttpState>,
    session: CitizenSession,
    path: web::Path<String>,
) -> ApiResult<web::Json<PaymentReceipt>> {
    let id: PaymentId = parse_id(&path, FieldName::new("id"))?;
    let details = state.payments.receipt(session.principal(), &id).await?;
    Ok(web::Json(details.into()))
}
