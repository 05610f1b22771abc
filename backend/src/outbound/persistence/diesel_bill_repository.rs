//! PostgreSQL-backed `BillRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{BillRepository, RecordStoreError};
use crate::domain::{
    Bill, BillFilter, BillId, BillStatus, BillWithCitizen, CitizenId, sort_by_due_date,
};

use super::diesel_citizen_repository::load_citizen_summaries;
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BillRow, convert_all};
use super::pool::DbPool;
use super::schema::bills;

/// Diesel implementation of the [`BillRepository`] port.
#[derive(Clone)]
pub struct DieselBillRepository {
    pool: DbPool,
}

impl DieselBillRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillRepository for DieselBillRepository {
    async fn insert(&self, bill: &Bill) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(bills::table)
            .values(BillRow::from(bill))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find(&self, id: &BillId) -> Result<Option<Bill>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bills::table
            .find(id.as_uuid())
            .select(BillRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Bill::try_from).transpose()
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
        filter: BillFilter,
    ) -> Result<Vec<Bill>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = bills::table
            .filter(bills::citizen_id.eq(citizen.as_uuid()))
            .select(BillRow::as_select())
            .into_boxed();
        if filter == BillFilter::Outstanding {
            query = query.filter(
                bills::status.eq_any([BillStatus::Pending.as_str(), BillStatus::Overdue.as_str()]),
            );
        }
        let rows = query
            .order(bills::due_date.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut bills: Vec<Bill> = convert_all(rows)?;
        sort_by_due_date(&mut bills);
        Ok(bills)
    }

    async fn list_all(&self) -> Result<Vec<BillWithCitizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bills::table
            .order(bills::created_at.desc())
            .select(BillRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let bills: Vec<Bill> = convert_all(rows)?;
        let summaries =
            load_citizen_summaries(&mut conn, bills.iter().map(|bill| *bill.citizen_id.as_uuid()))
                .await?;
        Ok(bills
            .into_iter()
            .map(|bill| BillWithCitizen {
                citizen: summaries
                    .get(bill.citizen_id.as_uuid())
                    .cloned()
                    .unwrap_or_default(),
                bill,
            })
            .collect())
    }
}
