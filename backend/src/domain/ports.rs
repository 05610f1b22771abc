//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, token codec, password hasher, OTP sender,
//! identity provider) are implemented by outbound adapters. Driving ports
//! (`*Service`, `AuthGate`, `LoginService`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_repository;
mod announcement_repository;
mod announcement_service;
mod auth_gate;
mod bill_repository;
mod bill_service;
mod citizen_repository;
mod citizen_service;
mod complaint_repository;
mod complaint_service;
mod dashboard_repository;
mod dashboard_service;
mod identity_provider;
mod login_service;
mod notification_repository;
mod notification_service;
mod otp_repository;
mod otp_sender;
mod password_hasher;
mod payment_repository;
mod payment_service;
mod record_store;
mod service_request_repository;
mod service_request_service;
mod token_codec;

pub use admin_repository::AdminRepository;
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use announcement_repository::AnnouncementRepository;
#[cfg(test)]
pub use announcement_repository::MockAnnouncementRepository;
pub use announcement_service::AnnouncementService;
#[cfg(test)]
pub use announcement_service::MockAnnouncementService;
#[cfg(test)]
pub use auth_gate::MockAuthGate;
pub use auth_gate::{AuthGate, require_role};
pub use bill_repository::BillRepository;
#[cfg(test)]
pub use bill_repository::MockBillRepository;
pub use bill_service::BillService;
#[cfg(test)]
pub use bill_service::MockBillService;
pub use citizen_repository::CitizenRepository;
#[cfg(test)]
pub use citizen_repository::MockCitizenRepository;
pub use citizen_service::CitizenService;
#[cfg(test)]
pub use citizen_service::MockCitizenService;
pub use complaint_repository::ComplaintRepository;
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_service::ComplaintService;
#[cfg(test)]
pub use complaint_service::MockComplaintService;
pub use dashboard_repository::DashboardRepository;
#[cfg(test)]
pub use dashboard_repository::MockDashboardRepository;
pub use dashboard_service::DashboardService;
#[cfg(test)]
pub use dashboard_service::MockDashboardService;
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{ExternalIdentity, IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, OtpDispatch, OtpLogin};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::NotificationRepository;
#[cfg(test)]
pub use notification_service::MockNotificationService;
pub use notification_service::NotificationService;
#[cfg(test)]
pub use otp_repository::MockOtpRepository;
pub use otp_repository::OtpRepository;
#[cfg(test)]
pub use otp_sender::MockOtpSender;
pub use otp_sender::{DeliveredOtp, OtpDeliveryError, OtpSender};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, SettlementError};
#[cfg(test)]
pub use payment_service::MockPaymentService;
pub use payment_service::{PaymentRequest, PaymentService};
pub use record_store::{RecordStoreError, map_allocation_error};
#[cfg(test)]
pub use service_request_repository::MockServiceRequestRepository;
pub use service_request_repository::ServiceRequestRepository;
#[cfg(test)]
pub use service_request_service::MockServiceRequestService;
pub use service_request_service::ServiceRequestService;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
