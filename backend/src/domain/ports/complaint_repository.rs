//! Port abstraction for complaint storage.

use async_trait::async_trait;

use crate::domain::{CitizenId, Complaint, ComplaintId, ComplaintUpdate, ComplaintWithCitizen};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Insert a new complaint. A taken complaint number yields
    /// [`RecordStoreError::DuplicateReference`].
    async fn insert(&self, complaint: &Complaint) -> Result<(), RecordStoreError>;

    /// Fetch a complaint by identifier regardless of owner.
    async fn find(&self, id: &ComplaintId) -> Result<Option<Complaint>, RecordStoreError>;

    /// A citizen's complaints, newest first.
    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<Complaint>, RecordStoreError>;

    /// Every complaint with its citizen's name and mobile, newest first.
    async fn list_all(&self) -> Result<Vec<ComplaintWithCitizen>, RecordStoreError>;

    /// Apply a status change. Returns `false` when the complaint is absent.
    async fn update(
        &self,
        id: &ComplaintId,
        update: &ComplaintUpdate,
    ) -> Result<bool, RecordStoreError>;
}
