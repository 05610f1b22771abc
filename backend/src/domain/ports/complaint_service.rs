//! Driving port for complaints.

use async_trait::async_trait;

use crate::domain::{
    CitizenId, Complaint, ComplaintDraft, ComplaintId, ComplaintStatus, ComplaintWithCitizen,
    Error, Principal,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintService: Send + Sync {
    /// File a new complaint for the caller.
    async fn file(&self, citizen: &CitizenId, draft: ComplaintDraft) -> Result<Complaint, Error>;

    /// The caller's complaints, newest first.
    async fn list_complaints(&self, citizen: &CitizenId) -> Result<Vec<Complaint>, Error>;

    /// One complaint, if visible to `principal`.
    async fn complaint(&self, principal: &Principal, id: &ComplaintId)
    -> Result<Complaint, Error>;

    /// Every complaint with citizen name and mobile (administrators).
    async fn list_all_complaints(&self) -> Result<Vec<ComplaintWithCitizen>, Error>;

    /// Change status and resolution remarks, if visible to `principal`.
    async fn update_status(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        status: ComplaintStatus,
        resolution_remarks: Option<String>,
    ) -> Result<(), Error>;
}
