//! Domain primitives, records and services.
//!
//! Purpose: Define the strongly typed records handled by the citizen
//! helpdesk (citizens, bills, payments, service requests, complaints,
//! notifications, announcements) together with the services that enforce
//! ownership and lifecycle rules. Adapters live outside this module and
//! reach it only through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Principal (alias to `auth::Principal`) — authenticated caller.
//! - Record types such as `Bill`, `Payment` and `Complaint`.
//! - Service implementations of the driving ports, e.g. `PaymentDesk`.

pub mod admin;
pub mod admin_bootstrap;
pub mod announcement;
pub mod announcement_service;
pub mod auth;
pub mod auth_gate_service;
pub mod bill;
pub mod bill_service;
pub mod citizen;
pub mod citizen_service;
pub mod complaint;
pub mod complaint_service;
pub mod dashboard;
pub mod dashboard_service;
pub mod error;
pub mod fixed_point;
pub mod ids;
pub mod labels;
pub mod login_service;
pub mod notification;
pub mod notification_service;
pub mod otp;
pub mod ownership;
pub mod payment;
pub mod payment_service;
pub mod ports;
pub mod provisioning;
pub mod reference_code;
pub mod service_request;
pub mod service_request_service;
#[cfg(test)]
pub(crate) mod test_clock;
pub mod trace_id;

pub use self::admin::{AdminAccount, BOOTSTRAP_ADMIN_ROLE, DEFAULT_ADMIN_ROLE};
pub use self::admin_bootstrap::{BOOTSTRAP_ADMIN_NAME, BootstrapOutcome, ensure_bootstrap_admin};
pub use self::announcement::{Announcement, AnnouncementDraft, AnnouncementKind, parse_window_bound};
pub use self::announcement_service::AnnouncementBoard;
pub use self::auth::{
    AdminCredentials, AuthSession, AuthValidationError, BearerToken, MobileNumber, OtpCode,
    Principal, Role, TokenClaims,
};
pub use self::auth_gate_service::{DelegatedAuthGate, TokenAuthGate};
pub use self::bill::{
    Bill, BillDraft, BillFilter, BillStatus, BillWithCitizen, ServiceType, sort_by_due_date,
};
pub use self::bill_service::BillLedger;
pub use self::citizen::{
    Citizen, CitizenIdentity, CitizenLookup, CitizenProfile, CitizenSummary, DEFAULT_LANGUAGE,
    Provisioned,
};
pub use self::citizen_service::CitizenAccounts;
pub use self::complaint::{
    Complaint, ComplaintCategory, ComplaintDraft, ComplaintStatus, ComplaintUpdate,
    ComplaintWithCitizen, Priority,
};
pub use self::complaint_service::ComplaintDesk;
pub use self::dashboard::DashboardSummary;
pub use self::dashboard_service::DashboardReporter;
pub use self::error::{Error, ErrorCode};
pub use self::fixed_point::{FixedPoint, FixedPointError};
pub use self::ids::{
    AdminId, AnnouncementId, BillId, CitizenId, ComplaintId, InvalidRecordId, NotificationId,
    OtpChallengeId, PaymentId, ServiceRequestId,
};
pub use self::labels::UnknownLabel;
pub use self::login_service::{LoginAdapters, LoginPolicy, OtpLoginService};
pub use self::notification::{Audience, Notification, NotificationDraft, NotificationKind};
pub use self::notification_service::NotificationCentre;
pub use self::otp::{DEFAULT_OTP_TTL_MINUTES, OtpChallenge, OtpDigest};
pub use self::ownership::{Owned, ensure_visible, is_visible_to};
pub use self::payment::{BillSummary, Payment, PaymentDetails, PaymentStatus, Settlement};
pub use self::payment_service::PaymentDesk;
pub use self::provisioning::CitizenProvisioner;
pub use self::reference_code::{
    RandomReferenceCodes, ReferenceCode, ReferenceCodeGenerator, ReferenceKind,
};
pub use self::service_request::{
    RequestType, ServiceRequest, ServiceRequestDraft, ServiceRequestStatus, ServiceRequestUpdate,
    ServiceRequestWithCitizen,
};
pub use self::service_request_service::ServiceRequestDesk;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use suvidha::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
