//! Complaint filing and resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ComplaintRepository, ComplaintService, map_allocation_error};
use crate::domain::reference_code::{
    ReferenceCodeGenerator, ReferenceKind, retry_on_reference_collision,
};
use crate::domain::{
    CitizenId, Complaint, ComplaintDraft, ComplaintId, ComplaintStatus, ComplaintUpdate,
    ComplaintWithCitizen, Error, Principal, ensure_visible,
};

const NOT_FOUND: &str = "Complaint not found";

/// Service implementing the [`ComplaintService`] driving port.
pub struct ComplaintDesk<R> {
    complaints: Arc<R>,
    codes: Arc<dyn ReferenceCodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R> ComplaintDesk<R> {
    /// Create the service.
    pub fn new(
        complaints: Arc<R>,
        codes: Arc<dyn ReferenceCodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            complaints,
            codes,
            clock,
        }
    }
}

#[async_trait]
impl<R> ComplaintService for ComplaintDesk<R>
where
    R: ComplaintRepository,
{
    async fn file(&self, citizen: &CitizenId, draft: ComplaintDraft) -> Result<Complaint, Error> {
        if draft.description.trim().is_empty() {
            return Err(Error::invalid_request("description must not be empty"));
        }
        let now = self.clock.utc();
        let complaint = retry_on_reference_collision("complaint", || {
            let complaint = draft.clone().into_complaint(
                ComplaintId::random(),
                *citizen,
                self.codes.generate(ReferenceKind::Complaint),
                now,
            );
            async move { self.complaints.insert(&complaint).await.map(|()| complaint) }
        })
        .await
        .map_err(|err| map_allocation_error(err, "complaint"))?;

        info!(
            complaint_id = %complaint.id,
            complaint_number = %complaint.complaint_number,
            category = %complaint.category,
            "complaint filed"
        );
        Ok(complaint)
    }

    async fn list_complaints(&self, citizen: &CitizenId) -> Result<Vec<Complaint>, Error> {
        self.complaints
            .list_for_citizen(citizen)
            .await
            .map_err(|err| err.into_domain("complaint"))
    }

    async fn complaint(&self, principal: &Principal, id: &ComplaintId) -> Result<Complaint, Error> {
        let found = self
            .complaints
            .find(id)
            .await
            .map_err(|err| err.into_domain("complaint"))?;
        ensure_visible(found, principal, NOT_FOUND)
    }

    async fn list_all_complaints(&self) -> Result<Vec<ComplaintWithCitizen>, Error> {
        self.complaints
            .list_all()
            .await
            .map_err(|err| err.into_domain("complaint"))
    }

    async fn update_status(
        &self,
        principal: &Principal,
        id: &ComplaintId,
        status: ComplaintStatus,
        resolution_remarks: Option<String>,
    ) -> Result<(), Error> {
        self.complaint(principal, id).await?;
        let update = ComplaintUpdate::at(status, resolution_remarks, self.clock.utc());
        let updated = self
            .complaints
            .update(id, &update)
            .await
            .map_err(|err| err.into_domain("complaint"))?;
        if !updated {
            return Err(Error::not_found(NOT_FOUND));
        }
        info!(complaint_id = %id, status = %status, "complaint updated");
        Ok(())
    }
}
