//! Port abstraction for service request storage.

use async_trait::async_trait;

use crate::domain::{
    CitizenId, ServiceRequest, ServiceRequestId, ServiceRequestUpdate, ServiceRequestWithCitizen,
};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRequestRepository: Send + Sync {
    /// Insert a new request. A taken acknowledgment number yields
    /// [`RecordStoreError::DuplicateReference`].
    async fn insert(&self, request: &ServiceRequest) -> Result<(), RecordStoreError>;

    /// Fetch a request by identifier regardless of owner.
    async fn find(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, RecordStoreError>;

    /// A citizen's requests, newest first.
    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<ServiceRequest>, RecordStoreError>;

    /// Every request with its citizen's name and mobile, newest first.
    async fn list_all(&self) -> Result<Vec<ServiceRequestWithCitizen>, RecordStoreError>;

    /// Apply a status change. Returns `false` when the request is absent.
    async fn update(
        &self,
        id: &ServiceRequestId,
        update: &ServiceRequestUpdate,
    ) -> Result<bool, RecordStoreError>;
}
