//! In-process record store.
//!
//! Implements every repository port over plain collections behind one async
//! mutex. Each port call holds the lock for its whole body, so a bill
//! settlement is a single critical section and concurrent attempts on one
//! bill settle it at most once. Used when no database URL is configured and
//! by the integration suites.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{DashboardRepository, RecordStoreError};
use crate::domain::{
    AdminAccount, Announcement, Bill, BillStatus, Citizen, CitizenId, CitizenSummary, Complaint,
    ComplaintStatus, DashboardSummary, Notification, NotificationId, OtpChallenge, Payment,
    PaymentStatus, ServiceRequest, ServiceRequestStatus,
};

mod accounts;
mod billing;
mod casework;
mod messaging;

/// Shared in-process store. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
struct StoreState {
    citizens: Vec<Citizen>,
    admins: Vec<AdminAccount>,
    otp_challenges: Vec<OtpChallenge>,
    bills: Vec<Bill>,
    payments: Vec<Payment>,
    service_requests: Vec<ServiceRequest>,
    complaints: Vec<Complaint>,
    notifications: Vec<Notification>,
    read_receipts: HashMap<(NotificationId, CitizenId), DateTime<Utc>>,
    announcements: Vec<Announcement>,
}

impl StoreState {
    fn citizen(&self, id: &CitizenId) -> Option<&Citizen> {
        self.citizens.iter().find(|citizen| citizen.id == *id)
    }

    fn citizen_summary(&self, id: &CitizenId) -> CitizenSummary {
        self.citizen(id).map(CitizenSummary::from).unwrap_or_default()
    }
}

fn duplicate(reference: &str) -> RecordStoreError {
    RecordStoreError::duplicate_reference(reference.to_owned())
}

fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> u64 {
    items.iter().filter(|item| predicate(item)).count() as u64
}

#[async_trait]
impl DashboardRepository for InMemoryStore {
    async fn summary(&self) -> Result<DashboardSummary, RecordStoreError> {
        let state = self.state.lock().await;
        let settled = || {
            state
                .payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Success)
        };
        Ok(DashboardSummary {
            citizens_total: state.citizens.len() as u64,
            bills_total: state.bills.len() as u64,
            bills_pending: count(&state.bills, |bill| bill.status == BillStatus::Pending),
            payments_total: settled().count() as u64,
            payments_revenue: settled().map(|payment| payment.amount).sum(),
            complaints_total: state.complaints.len() as u64,
            complaints_pending: count(&state.complaints, |complaint| {
                complaint.status == ComplaintStatus::Submitted
            }),
            complaints_in_progress: count(&state.complaints, |complaint| {
                complaint.status == ComplaintStatus::InProgress
            }),
            complaints_resolved: count(&state.complaints, |complaint| {
                complaint.status == ComplaintStatus::Resolved
            }),
            service_requests_total: state.service_requests.len() as u64,
            service_requests_pending: count(&state.service_requests, |request| {
                request.status == ServiceRequestStatus::Submitted
            }),
        })
    }
}
