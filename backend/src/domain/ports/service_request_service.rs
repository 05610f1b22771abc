//! Driving port for service requests.

use async_trait::async_trait;

use crate::domain::{
    CitizenId, Error, Principal, ServiceRequest, ServiceRequestDraft, ServiceRequestId,
    ServiceRequestStatus, ServiceRequestWithCitizen,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestService: Send + Sync {
    /// File a new request for the caller.
    async fn submit(
        &self,
        citizen: &CitizenId,
        draft: ServiceRequestDraft,
    ) -> Result<ServiceRequest, Error>;

    /// The caller's requests, newest first.
    async fn list_requests(&self, citizen: &CitizenId) -> Result<Vec<ServiceRequest>, Error>;

    /// One request, if visible to `principal`.
    async fn request(
        &self,
        principal: &Principal,
        id: &ServiceRequestId,
    ) -> Result<ServiceRequest, Error>;

    /// Every request with citizen name and mobile (administrators).
    async fn list_all_requests(&self) -> Result<Vec<ServiceRequestWithCitizen>, Error>;

    /// Change status and remarks, if visible to `principal`.
    async fn update_status(
        &self,
        principal: &Principal,
        id: &ServiceRequestId,
        status: ServiceRequestStatus,
        remarks: Option<String>,
    ) -> Result<(), Error>;
}
