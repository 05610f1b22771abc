//! Assemble domain services over a concrete record store.
//!
//! [`RepositorySet`] names one adapter per repository port. It is implemented
//! for the in-process [`InMemoryStore`] and for a PostgreSQL [`DbPool`], so
//! [`build_http_state`] wires identical services over either backend.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminRepository, AnnouncementRepository, AuthGate, BillRepository, CitizenRepository,
    ComplaintRepository, DashboardRepository, IdentityProvider, NotificationRepository,
    OtpRepository, OtpSender, PasswordHasher, PaymentRepository, ServiceRequestRepository,
    TokenCodec,
};
use crate::domain::{
    AnnouncementBoard, BillLedger, CitizenAccounts, ComplaintDesk, DashboardReporter,
    DelegatedAuthGate, LoginAdapters, LoginPolicy, NotificationCentre, OtpLoginService,
    PaymentDesk, ReferenceCodeGenerator, ServiceRequestDesk, TokenAuthGate,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselAdminRepository, DieselAnnouncementRepository, DieselBillRepository,
    DieselCitizenRepository, DieselComplaintRepository, DieselDashboardRepository,
    DieselNotificationRepository, DieselOtpRepository, DieselPaymentRepository,
    DieselServiceRequestRepository,
};

/// One adapter per repository port.
pub trait RepositorySet {
    type Citizens: CitizenRepository + 'static;
    type Admins: AdminRepository + 'static;
    type Otps: OtpRepository + 'static;
    type Bills: BillRepository + 'static;
    type Payments: PaymentRepository + 'static;
    type ServiceRequests: ServiceRequestRepository + 'static;
    type Complaints: ComplaintRepository + 'static;
    type Notifications: NotificationRepository + 'static;
    type Announcements: AnnouncementRepository + 'static;
    type Dashboard: DashboardRepository + 'static;

    fn citizens(&self) -> Arc<Self::Citizens>;
    fn admins(&self) -> Arc<Self::Admins>;
    fn otps(&self) -> Arc<Self::Otps>;
    fn bills(&self) -> Arc<Self::Bills>;
    fn payments(&self) -> Arc<Self::Payments>;
    fn service_requests(&self) -> Arc<Self::ServiceRequests>;
    fn complaints(&self) -> Arc<Self::Complaints>;
    fn notifications(&self) -> Arc<Self::Notifications>;
    fn announcements(&self) -> Arc<Self::Announcements>;
    fn dashboard(&self) -> Arc<Self::Dashboard>;
}

impl RepositorySet for InMemoryStore {
    type Citizens = Self;
    type Admins = Self;
    type Otps = Self;
    type Bills = Self;
    type Payments = Self;
    type ServiceRequests = Self;
    type Complaints = Self;
    type Notifications = Self;
    type Announcements = Self;
    type Dashboard = Self;

    fn citizens(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn admins(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn otps(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn bills(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn payments(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn service_requests(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn complaints(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn notifications(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn announcements(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }

    fn dashboard(&self) -> Arc<Self> {
        Arc::new(self.clone())
    }
}

impl RepositorySet for DbPool {
    type Citizens = DieselCitizenRepository;
    type Admins = DieselAdminRepository;
    type Otps = DieselOtpRepository;
    type Bills = DieselBillRepository;
    type Payments = DieselPaymentRepository;
    type ServiceRequests = DieselServiceRequestRepository;
    type Complaints = DieselComplaintRepository;
    type Notifications = DieselNotificationRepository;
    type Announcements = DieselAnnouncementRepository;
    type Dashboard = DieselDashboardRepository;

    fn citizens(&self) -> Arc<Self::Citizens> {
        Arc::new(DieselCitizenRepository::new(self.clone()))
    }

    fn admins(&self) -> Arc<Self::Admins> {
        Arc::new(DieselAdminRepository::new(self.clone()))
    }

    fn otps(&self) -> Arc<Self::Otps> {
        Arc::new(DieselOtpRepository::new(self.clone()))
    }

    fn bills(&self) -> Arc<Self::Bills> {
        Arc::new(DieselBillRepository::new(self.clone()))
    }

    fn payments(&self) -> Arc<Self::Payments> {
        Arc::new(DieselPaymentRepository::new(self.clone()))
    }

    fn service_requests(&self) -> Arc<Self::ServiceRequests> {
        Arc::new(DieselServiceRequestRepository::new(self.clone()))
    }

    fn complaints(&self) -> Arc<Self::Complaints> {
        Arc::new(DieselComplaintRepository::new(self.clone()))
    }

    fn notifications(&self) -> Arc<Self::Notifications> {
        Arc::new(DieselNotificationRepository::new(self.clone()))
    }

    fn announcements(&self) -> Arc<Self::Announcements> {
        Arc::new(DieselAnnouncementRepository::new(self.clone()))
    }

    fn dashboard(&self) -> Arc<Self::Dashboard> {
        Arc::new(DieselDashboardRepository::new(self.clone()))
    }
}

/// How bearer tokens are resolved to principals.
pub enum TokenVerification {
    /// Verify tokens signed by the service's own codec.
    SelfIssued,
    /// Verify tokens with an external identity provider.
    Delegated(Arc<dyn IdentityProvider>),
}

/// Non-repository collaborators shared by the services.
#[derive(Clone)]
pub struct ServiceAdapters {
    pub clock: Arc<dyn Clock>,
    pub codes: Arc<dyn ReferenceCodeGenerator>,
    pub token_codec: Arc<dyn TokenCodec>,
    pub otp_sender: Arc<dyn OtpSender>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub policy: LoginPolicy,
}

/// Build handler state with every service wired over `repos`.
pub fn build_http_state<R>(
    repos: &R,
    adapters: ServiceAdapters,
    verification: TokenVerification,
) -> HttpState
where
    R: RepositorySet,
{
    let ServiceAdapters {
        clock,
        codes,
        token_codec,
        otp_sender,
        password_hasher,
        policy,
    } = adapters;

    let auth: Arc<dyn AuthGate> = match verification {
        TokenVerification::SelfIssued => Arc::new(TokenAuthGate::new(
            Arc::clone(&token_codec),
            Arc::clone(&clock),
        )),
        TokenVerification::Delegated(provider) => Arc::new(DelegatedAuthGate::new(
            provider,
            repos.admins(),
            repos.citizens(),
            Arc::clone(&clock),
        )),
    };

    let login = OtpLoginService::new(
        repos.otps(),
        repos.citizens(),
        repos.admins(),
        LoginAdapters {
            otp_sender,
            token_codec,
            password_hasher,
            clock: Arc::clone(&clock),
        },
        policy,
    );

    HttpState::new(
        auth,
        HttpStatePorts {
            login: Arc::new(login),
            citizens: Arc::new(CitizenAccounts::new(repos.citizens(), Arc::clone(&clock))),
            bills: Arc::new(BillLedger::new(
                repos.bills(),
                repos.citizens(),
                Arc::clone(&codes),
                Arc::clone(&clock),
            )),
            payments: Arc::new(PaymentDesk::new(
                repos.payments(),
                Arc::clone(&codes),
                Arc::clone(&clock),
            )),
            service_requests: Arc::new(ServiceRequestDesk::new(
                repos.service_requests(),
                Arc::clone(&codes),
                Arc::clone(&clock),
            )),
            complaints: Arc::new(ComplaintDesk::new(
                repos.complaints(),
                Arc::clone(&codes),
                Arc::clone(&clock),
            )),
            notifications: Arc::new(NotificationCentre::new(
                repos.notifications(),
                repos.citizens(),
                Arc::clone(&clock),
            )),
            announcements: Arc::new(AnnouncementBoard::new(
                repos.announcements(),
                Arc::clone(&clock),
            )),
            dashboard: Arc::new(DashboardReporter::new(repos.dashboard())),
        },
    )
}
