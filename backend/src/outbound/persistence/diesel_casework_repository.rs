//! PostgreSQL-backed service request and complaint repositories.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ComplaintRepository, RecordStoreError, ServiceRequestRepository};
use crate::domain::{
    CitizenId, Complaint, ComplaintId, ComplaintUpdate, ComplaintWithCitizen, ServiceRequest,
    ServiceRequestId, ServiceRequestUpdate, ServiceRequestWithCitizen,
};

use super::diesel_citizen_repository::load_citizen_summaries;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ComplaintRow, ServiceRequestRow, convert_all};
use super::pool::DbPool;
use super::schema::{complaints, service_requests};

/// Diesel implementation of the [`ServiceRequestRepository`] port.
#[derive(Clone)]
pub struct DieselServiceRequestRepository {
    pool: DbPool,
}

impl DieselServiceRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRequestRepository for DieselServiceRequestRepository {
    async fn insert(&self, request: &ServiceRequest) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(service_requests::table)
            .values(ServiceRequestRow::from(request))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(
        &self,
        id: &ServiceRequestId,
    ) -> Result<Option<ServiceRequest>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = service_requests::table
            .find(id.as_uuid())
            .select(ServiceRequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(ServiceRequest::try_from).transpose()
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<ServiceRequest>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = service_requests::table
            .filter(service_requests::citizen_id.eq(citizen.as_uuid()))
            .order(service_requests::created_at.desc())
            .select(ServiceRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_all(rows)
    }

    async fn list_all(&self) -> Result<Vec<ServiceRequestWithCitizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = service_requests::table
            .order(service_requests::created_at.desc())
            .select(ServiceRequestRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let requests: Vec<ServiceRequest> = convert_all(rows)?;
        let summaries = load_citizen_summaries(
            &mut conn,
            requests.iter().map(|request| *request.citizen_id.as_uuid()),
        )
        .await?;
        Ok(requests
            .into_iter()
            .map(|request| ServiceRequestWithCitizen {
                citizen: summaries
                    .get(request.citizen_id.as_uuid())
                    .cloned()
                    .unwrap_or_default(),
                request,
            })
            .collect())
    }

    async fn update(
        &self,
        id: &ServiceRequestId,
        update: &ServiceRequestUpdate,
    ) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(service_requests::table.find(id.as_uuid()))
            .set((
                service_requests::status.eq(update.status.as_str()),
                service_requests::remarks.eq(update.remarks.as_deref()),
                service_requests::updated_at.eq(update.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }
}

/// Diesel implementation of the [`ComplaintRepository`] port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn insert(&self, complaint: &Complaint) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(complaints::table)
            .values(ComplaintRow::from(complaint))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &ComplaintId) -> Result<Option<Complaint>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = complaints::table
            .find(id.as_uuid())
            .select(ComplaintRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Complaint::try_from).transpose()
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<Complaint>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = complaints::table
            .filter(complaints::citizen_id.eq(citizen.as_uuid()))
            .order(complaints::created_at.desc())
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_all(rows)
    }

    async fn list_all(&self) -> Result<Vec<ComplaintWithCitizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = complaints::table
            .order(complaints::created_at.desc())
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let complaints: Vec<Complaint> = convert_all(rows)?;
        let summaries = load_citizen_summaries(
            &mut conn,
            complaints.iter().map(|complaint| *complaint.citizen_id.as_uuid()),
        )
        .await?;
        Ok(complaints
            .into_iter()
            .map(|complaint| ComplaintWithCitizen {
                citizen: summaries
                    .get(complaint.citizen_id.as_uuid())
                    .cloned()
                    .unwrap_or_default(),
                complaint,
            })
            .collect())
    }

    async fn update(
        &self,
        id: &ComplaintId,
        update: &ComplaintUpdate,
    ) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(complaints::table.find(id.as_uuid()))
            .set((
                complaints::status.eq(update.status.as_str()),
                complaints::resolution_remarks.eq(update.resolution_remarks.as_deref()),
                complaints::resolved_at.eq(update.resolved_at),
                complaints::updated_at.eq(update.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(changed > 0)
    }
}
