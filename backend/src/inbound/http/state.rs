//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AnnouncementService, AuthGate, BillService, CitizenService, ComplaintService,
    DashboardService, LoginService, NotificationService, PaymentService, ServiceRequestService,
};

/// Parameter object bundling the use-case ports called by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub citizens: Arc<dyn CitizenService>,
    pub bills: Arc<dyn BillService>,
    pub payments: Arc<dyn PaymentService>,
    pub service_requests: Arc<dyn ServiceRequestService>,
    pub complaints: Arc<dyn ComplaintService>,
    pub notifications: Arc<dyn NotificationService>,
    pub announcements: Arc<dyn AnnouncementService>,
    pub dashboard: Arc<dyn DashboardService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Resolves bearer tokens for the session extractors.
    pub auth: Arc<dyn AuthGate>,
    pub login: Arc<dyn LoginService>,
    pub citizens: Arc<dyn CitizenService>,
    pub bills: Arc<dyn BillService>,
    pub payments: Arc<dyn PaymentService>,
    pub service_requests: Arc<dyn ServiceRequestService>,
    pub complaints: Arc<dyn ComplaintService>,
    pub notifications: Arc<dyn NotificationService>,
    pub announcements: Arc<dyn AnnouncementService>,
    pub dashboard: Arc<dyn DashboardService>,
}

impl HttpState {
    /// Construct state from the active auth gate and the use-case ports.
    pub fn new(auth: Arc<dyn AuthGate>, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            citizens,
            bills,
            payments,
            service_requests,
            complaints,
            notifications,
            announcements,
            dashboard,
        } = ports;
        Self {
            auth,
            login,
            citizens,
            bills,
            payments,
            service_requests,
            complaints,
            notifications,
            announcements,
            dashboard,
        }
    }
}
