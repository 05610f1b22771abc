//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::Principal;
use crate::domain::ports::{
    AuthGate, MockAnnouncementService, MockAuthGate, MockBillService, MockCitizenService,
    MockComplaintService, MockDashboardService, MockLoginService, MockNotificationService,
    MockPaymentService, MockServiceRequestService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Mocked ports for handler tests. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct TestPorts {
    pub auth: MockAuthGate,
    pub login: MockLoginService,
    pub citizens: MockCitizenService,
    pub bills: MockBillService,
    pub payments: MockPaymentService,
    pub service_requests: MockServiceRequestService,
    pub complaints: MockComplaintService,
    pub notifications: MockNotificationService,
    pub announcements: MockAnnouncementService,
    pub dashboard: MockDashboardService,
}

impl TestPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> HttpState {
        let auth: Arc<dyn AuthGate> = Arc::new(self.auth);
        HttpState::new(
            auth,
            HttpStatePorts {
                login: Arc::new(self.login),
                citizens: Arc::new(self.citizens),
                bills: Arc::new(self.bills),
                payments: Arc::new(self.payments),
                service_requests: Arc::new(self.service_requests),
                complaints: Arc::new(self.complaints),
                notifications: Arc::new(self.notifications),
                announcements: Arc::new(self.announcements),
                dashboard: Arc::new(self.dashboard),
            },
        )
    }

    /// Build an app with the mocked state; callers register services.
    pub fn into_app(
        self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(self.into_state()))
    }
}

/// Auth gate accepting any token as `principal`.
pub fn gate_resolving(principal: Principal) -> MockAuthGate {
    let mut gate = MockAuthGate::new();
    gate.expect_authenticate()
        .returning(move |_| Ok(principal));
    gate
}
