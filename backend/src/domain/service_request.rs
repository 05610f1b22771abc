//! Service requests such as new connections or meter reading visits.

use chrono::{DateTime, Utc};

use super::citizen::CitizenSummary;
use super::ids::{CitizenId, ServiceRequestId};
use super::labels::define_label_enum;
use super::ownership::Owned;
use super::reference_code::ReferenceCode;

define_label_enum! {
    /// Kind of work requested.
    pub enum RequestType ("request type") {
        NewConnection => "new_connection",
        MeterReading => "meter_reading",
        AddressChange => "address_change",
        Disconnection => "disconnection",
        Reconnection => "reconnection",
    }
}

define_label_enum! {
    /// Request lifecycle. Administrators may move between any two states.
    pub enum ServiceRequestStatus ("service request status") {
        Submitted => "submitted",
        UnderReview => "under_review",
        Approved => "approved",
        Rejected => "rejected",
        Completed => "completed",
    }
}

/// Stored service request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub id: ServiceRequestId,
    pub citizen_id: CitizenId,
    pub request_type: RequestType,
    /// Free-form utility label supplied by the client.
    pub service_type: String,
    pub description: Option<String>,
    pub status: ServiceRequestStatus,
    pub acknowledgment_number: ReferenceCode,
    /// Opaque document reference; uploads are handled elsewhere.
    pub documents: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for ServiceRequest {
    fn owner(&self) -> Option<CitizenId> {
        Some(self.citizen_id)
    }
}

/// Citizen input for a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestDraft {
    pub request_type: RequestType,
    pub service_type: String,
    pub description: Option<String>,
    pub documents: Option<String>,
}

impl ServiceRequestDraft {
    /// Materialise the draft as a submitted request.
    #[must_use]
    pub fn into_request(
        self,
        id: ServiceRequestId,
        citizen_id: CitizenId,
        acknowledgment_number: ReferenceCode,
        now: DateTime<Utc>,
    ) -> ServiceRequest {
        ServiceRequest {
            id,
            citizen_id,
            request_type: self.request_type,
            service_type: self.service_type,
            description: self.description,
            status: ServiceRequestStatus::Submitted,
            acknowledgment_number,
            documents: self.documents,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Administrator status change. Remarks are replaced, not merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestUpdate {
    pub status: ServiceRequestStatus,
    pub remarks: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequestUpdate {
    /// Apply the change to a stored request.
    pub fn apply_to(&self, request: &mut ServiceRequest) {
        request.status = self.status;
        request.remarks.clone_from(&self.remarks);
        request.updated_at = self.updated_at;
    }
}

/// Request joined with its citizen for admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequestWithCitizen {
    pub request: ServiceRequest,
    pub citizen: CitizenSummary,
}
