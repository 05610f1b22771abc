//! Service requests and complaints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{ComplaintRepository, RecordStoreError, ServiceRequestRepository};
use crate::domain::{
    CitizenId, Complaint, ComplaintId, ComplaintUpdate, ComplaintWithCitizen, ServiceRequest,
    ServiceRequestId, ServiceRequestUpdate, ServiceRequestWithCitizen,
};

use super::{InMemoryStore, duplicate};

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

#[async_trait]
impl ServiceRequestRepository for InMemoryStore {
    async fn insert(&self, request: &ServiceRequest) -> Result<(), RecordStoreError> {
        let mut state = self.state.lock().await;
        if state
            .service_requests
            .iter()
            .any(|existing| existing.acknowledgment_number == request.acknowledgment_number)
        {
            return Err(duplicate(request.acknowledgment_number.as_str()));
        }
        state.service_requests.push(request.clone());
        Ok(())
    }

    async fn find(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .service_requests
            .iter()
            .find(|request| request.id == *id)
            .cloned())
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<ServiceRequest>, RecordStoreError> {
        let state = self.state.lock().await;
        let owned = state
            .service_requests
            .iter()
            .filter(|request| request.citizen_id == *citizen)
            .cloned()
            .collect();
        Ok(newest_first(owned, |request| request.created_at))
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequestWithCitizen>, RecordStoreError> {
        let state = self.state.lock().await;
        let all = newest_first(state.service_requests.clone(), |request| request.created_at);
        Ok(all
            .into_iter()
            .map(|request| ServiceRequestWithCitizen {
                citizen: state.citizen_summary(&request.citizen_id),
                request,
            })
            .collect())
    }

    async fn update(
        &self,
        id: &ServiceRequestId,
        update: &ServiceRequestUpdate,
    ) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        let Some(request) = state.service_requests.iter_mut().find(|request| request.id == *id) else {
            return Ok(false);
        };
        update.apply_to(request);
        Ok(true)
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryStore {
    async fn insert(&self, complaint: &Complaint) -> Result<(), RecordStoreError> {
        let mut state = self.state.lock().await;
        if state
            .complaints
            .iter()
            .any(|existing| existing.complaint_number == complaint.complaint_number)
        {
            return Err(duplicate(complaint.complaint_number.as_str()));
        }
        state.complaints.push(complaint.clone());
        Ok(())
    }

    async fn find(&self, id: &ComplaintId) -> Result<Option<Complaint>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .complaints
            .iter()
            .find(|complaint| complaint.id == *id)
            .cloned())
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<Complaint>, RecordStoreError> {
        let state = self.state.lock().await;
        let owned = state
            .complaints
            .iter()
            .filter(|complaint| complaint.citizen_id == *citizen)
            .cloned()
            .collect();
        Ok(newest_first(owned, |complaint| complaint.created_at))
    }

    async fn list_all(&self) -> Result<Vec<ComplaintWithCitizen>, RecordStoreError> {
        let state = self.state.lock().await;
        let all = newest_first(state.complaints.clone(), |complaint| complaint.created_at);
        Ok(all
            .into_iter()
            .map(|complaint| ComplaintWithCitizen {
                citizen: state.citizen_summary(&complaint.citizen_id),
                complaint,
            })
            .collect())
    }

    async fn update(
        &self,
        id: &ComplaintId,
        update: &ComplaintUpdate,
    ) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        let Some(complaint) = state.complaints.iter_mut().find(|complaint| complaint.id == *id) else {
            return Ok(false);
        };
        update.apply_to(complaint);
        Ok(true)
    }
}
