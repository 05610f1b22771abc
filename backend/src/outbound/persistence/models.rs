//! Diesel row structs and their conversions to domain records.
//!
//! Rows never leave the persistence module.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::RecordStoreError;
use crate::domain::{
    AdminAccount, AdminId, Announcement, AnnouncementId, Audience, Bill, BillId, Citizen,
    CitizenId, Complaint, ComplaintId, FixedPoint, Notification, NotificationId, OtpChallenge,
    OtpChallengeId, Payment, PaymentId, ReferenceCode, ServiceRequest,
    ServiceRequestId,
};

use super::error_mapping::parse_label;
use super::schema::{
    admins, announcements, bills, citizens, complaints, notification_reads, notifications,
    otp_challenges, payments, service_requests,
};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = citizens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CitizenRow {
    pub id: Uuid,
    pub mobile: Option<String>,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub language: String,
    pub external_subject: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Citizen> for CitizenRow {
    fn from(citizen: &Citizen) -> Self {
        Self {
            id: *citizen.id.as_uuid(),
            mobile: Some(citizen.mobile.clone()).filter(|mobile| !mobile.is_empty()),
            name: citizen.name.clone(),
            aadhaar_number: citizen.aadhaar_number.clone(),
            email: citizen.email.clone(),
            address: citizen.address.clone(),
            city: citizen.city.clone(),
            state: citizen.state.clone(),
            pincode: citizen.pincode.clone(),
            language: citizen.language.clone(),
            external_subject: citizen.external_subject.clone(),
            created_at: citizen.created_at,
            updated_at: citizen.updated_at,
        }
    }
}

impl From<CitizenRow> for Citizen {
    fn from(row: CitizenRow) -> Self {
        Self {
            id: CitizenId::from_uuid(row.id),
            mobile: row.mobile.unwrap_or_default(),
            name: row.name,
            aadhaar_number: row.aadhaar_number,
            email: row.email,
            address: row.address,
            city: row.city,
            state: row.state,
            pincode: row.pincode,
            language: row.language,
            external_subject: row.external_subject,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Profile columns replaced by a profile update. `None` writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = citizens)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct CitizenProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub aadhaar_number: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub language: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub external_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminAccount> for AdminRow {
    fn from(account: &AdminAccount) -> Self {
        Self {
            id: *account.id.as_uuid(),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            name: account.name.clone(),
            role: account.role.clone(),
            external_subject: account.external_subject.clone(),
            created_at: account.created_at,
        }
    }
}

impl From<AdminRow> for AdminAccount {
    fn from(row: AdminRow) -> Self {
        Self {
            id: AdminId::from_uuid(row.id),
            username: row.username,
            password_hash: row.password_hash,
            name: row.name,
            role: row.role,
            external_subject: row.external_subject,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = otp_challenges)]
pub(crate) struct NewOtpChallengeRow<'a> {
    pub id: Uuid,
    pub mobile: &'a str,
    pub code_digest: &'a str,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a OtpChallenge> for NewOtpChallengeRow<'a> {
    fn from(challenge: &'a OtpChallenge) -> Self {
        Self {
            id: *challenge.id.as_uuid(),
            mobile: &challenge.mobile,
            code_digest: challenge.code_digest.as_str(),
            expires_at: challenge.expires_at,
            used: challenge.used,
            created_at: challenge.created_at,
        }
    }
}

/// Identifier returned by the challenge-consuming `UPDATE`.
#[derive(Debug, QueryableByName)]
pub(crate) struct ConsumedChallengeRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub id: Uuid,
}

impl ConsumedChallengeRow {
    pub(crate) fn into_id(self) -> OtpChallengeId {
        OtpChallengeId::from_uuid(self.id)
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bills)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BillRow {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub service_type: String,
    pub bill_number: String,
    pub amount_paise: i64,
    pub due_date: NaiveDate,
    pub billing_period: Option<String>,
    pub status: String,
    pub consumer_number: Option<String>,
    pub meter_reading_hundredths: Option<i64>,
    pub units_consumed_hundredths: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl From<&Bill> for BillRow {
    fn from(bill: &Bill) -> Self {
        Self {
            id: *bill.id.as_uuid(),
            citizen_id: *bill.citizen_id.as_uuid(),
            service_type: bill.service_type.as_str().to_owned(),
            bill_number: bill.bill_number.as_str().to_owned(),
            amount_paise: bill.amount.hundredths(),
            due_date: bill.due_date,
            billing_period: bill.billing_period.clone(),
            status: bill.status.as_str().to_owned(),
            consumer_number: bill.consumer_number.clone(),
            meter_reading_hundredths: bill.meter_reading.map(FixedPoint::hundredths),
            units_consumed_hundredths: bill.units_consumed.map(FixedPoint::hundredths),
            created_at: bill.created_at,
        }
    }
}

impl TryFrom<BillRow> for Bill {
    type Error = RecordStoreError;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BillId::from_uuid(row.id),
            citizen_id: CitizenId::from_uuid(row.citizen_id),
            service_type: parse_label("service type", &row.service_type)?,
            bill_number: ReferenceCode::from_stored(row.bill_number),
            amount: FixedPoint::from_hundredths(row.amount_paise),
            due_date: row.due_date,
            billing_period: row.billing_period,
            status: parse_label("bill status", &row.status)?,
            consumer_number: row.consumer_number,
            meter_reading: row.meter_reading_hundredths.map(FixedPoint::from_hundredths),
            units_consumed: row.units_consumed_hundredths.map(FixedPoint::from_hundredths),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub bill_id: Uuid,
    pub amount_paise: i64,
    pub payment_method: String,
    pub transaction_id: String,
    pub status: String,
    pub receipt_number: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            citizen_id: *payment.citizen_id.as_uuid(),
            bill_id: *payment.bill_id.as_uuid(),
            amount_paise: payment.amount.hundredths(),
            payment_method: payment.payment_method.clone(),
            transaction_id: payment.transaction_id.as_str().to_owned(),
            status: payment.status.as_str().to_owned(),
            receipt_number: payment.receipt_number.as_str().to_owned(),
            created_at: payment.created_at,
        }
    }
}

impl TryFrom<PaymentRow> for Payment {
    type Error = RecordStoreError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::from_uuid(row.id),
            citizen_id: CitizenId::from_uuid(row.citizen_id),
            bill_id: BillId::from_uuid(row.bill_id),
            amount: FixedPoint::from_hundredths(row.amount_paise),
            payment_method: row.payment_method,
            transaction_id: ReferenceCode::from_stored(row.transaction_id),
            status: parse_label("payment status", &row.status)?,
            receipt_number: ReferenceCode::from_stored(row.receipt_number),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = service_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ServiceRequestRow {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub request_type: String,
    pub service_type: String,
    pub description: Option<String>,
    pub status: String,
    pub acknowledgment_number: String,
    pub documents: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ServiceRequest> for ServiceRequestRow {
    fn from(request: &ServiceRequest) -> Self {
        Self {
            id: *request.id.as_uuid(),
            citizen_id: *request.citizen_id.as_uuid(),
            request_type: request.request_type.as_str().to_owned(),
            service_type: request.service_type.clone(),
            description: request.description.clone(),
            status: request.status.as_str().to_owned(),
            acknowledgment_number: request.acknowledgment_number.as_str().to_owned(),
            documents: request.documents.clone(),
            remarks: request.remarks.clone(),
            created_at: request.created_at,
            updated_at: request.updated_at,
        }
    }
}

impl TryFrom<ServiceRequestRow> for ServiceRequest {
    type Error = RecordStoreError;

    fn try_from(row: ServiceRequestRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ServiceRequestId::from_uuid(row.id),
            citizen_id: CitizenId::from_uuid(row.citizen_id),
            request_type: parse_label("request type", &row.request_type)?,
            service_type: row.service_type,
            description: row.description,
            status: parse_label("service request status", &row.status)?,
            acknowledgment_number: ReferenceCode::from_stored(row.acknowledgment_number),
            documents: row.documents,
            remarks: row.remarks,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: Uuid,
    pub citizen_id: Uuid,
    pub category: String,
    pub subcategory: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub status: String,
    pub complaint_number: String,
    pub priority: String,
    pub resolution_remarks: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Complaint> for ComplaintRow {
    fn from(complaint: &Complaint) -> Self {
        Self {
            id: *complaint.id.as_uuid(),
            citizen_id: *complaint.citizen_id.as_uuid(),
            category: complaint.category.as_str().to_owned(),
            subcategory: complaint.subcategory.clone(),
            description: complaint.description.clone(),
            location: complaint.location.clone(),
            photo: complaint.photo.clone(),
            status: complaint.status.as_str().to_owned(),
            complaint_number: complaint.complaint_number.as_str().to_owned(),
            priority: complaint.priority.as_str().to_owned(),
            resolution_remarks: complaint.resolution_remarks.clone(),
            resolved_at: complaint.resolved_at,
            created_at: complaint.created_at,
            updated_at: complaint.updated_at,
        }
    }
}

impl TryFrom<ComplaintRow> for Complaint {
    type Error = RecordStoreError;

    fn try_from(row: ComplaintRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ComplaintId::from_uuid(row.id),
            citizen_id: CitizenId::from_uuid(row.citizen_id),
            category: parse_label("complaint category", &row.category)?,
            subcategory: row.subcategory,
            description: row.description,
            location: row.location,
            photo: row.photo,
            status: parse_label("complaint status", &row.status)?,
            complaint_number: ReferenceCode::from_stored(row.complaint_number),
            priority: parse_label("priority", &row.priority)?,
            resolution_remarks: row.resolution_remarks,
            resolved_at: row.resolved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub citizen_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub target_all: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationRow {
    fn from(notification: &Notification) -> Self {
        Self {
            id: *notification.id.as_uuid(),
            citizen_id: notification.citizen_id().map(|id| *id.as_uuid()),
            title: notification.title.clone(),
            message: notification.message.clone(),
            kind: notification.kind.as_str().to_owned(),
            is_read: notification.is_read,
            target_all: notification.target_all(),
            created_at: notification.created_at,
        }
    }
}

impl NotificationRow {
    /// Convert for `reader`; `broadcast_read` is whether a read receipt
    /// exists for that reader.
    pub(crate) fn into_notification(
        self,
        broadcast_read: bool,
    ) -> Result<Notification, RecordStoreError> {
        let audience = match self.citizen_id {
            Some(id) if !self.target_all => Audience::Citizen(CitizenId::from_uuid(id)),
            _ => Audience::Everyone,
        };
        let is_read = match audience {
            Audience::Citizen(_) => self.is_read,
            Audience::Everyone => broadcast_read,
        };
        Ok(Notification {
            id: NotificationId::from_uuid(self.id),
            audience,
            title: self.title,
            message: self.message,
            kind: parse_label("notification type", &self.kind)?,
            is_read,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notification_reads)]
pub(crate) struct NewNotificationReadRow {
    pub notification_id: Uuid,
    pub citizen_id: Uuid,
    pub read_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = announcements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AnnouncementRow {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub service_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<&Announcement> for AnnouncementRow {
    fn from(announcement: &Announcement) -> Self {
        Self {
            id: *announcement.id.as_uuid(),
            title: announcement.title.clone(),
            message: announcement.message.clone(),
            kind: announcement.kind.as_str().to_owned(),
            service_type: announcement.service_type.clone(),
            start_date: announcement.start_date,
            end_date: announcement.end_date,
            is_active: announcement.is_active,
            created_by: announcement.created_by.map(|id| *id.as_uuid()),
            created_at: announcement.created_at,
        }
    }
}

impl TryFrom<AnnouncementRow> for Announcement {
    type Error = RecordStoreError;

    fn try_from(row: AnnouncementRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: AnnouncementId::from_uuid(row.id),
            title: row.title,
            message: row.message,
            kind: parse_label("announcement type", &row.kind)?,
            service_type: row.service_type,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            created_by: row.created_by.map(AdminId::from_uuid),
            created_at: row.created_at,
        })
    }
}

/// Convert every row, failing on the first corrupt one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, RecordStoreError>
where
    T: TryFrom<R, Error = RecordStoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
