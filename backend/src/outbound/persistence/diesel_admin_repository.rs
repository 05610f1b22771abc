//! PostgreSQL-backed `AdminRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminRepository, RecordStoreError};
use crate::domain::{AdminAccount, AdminId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::AdminRow;
use super::pool::DbPool;
use super::schema::admins;

/// Diesel implementation of the [`AdminRepository`] port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admins::table
            .filter(admins::username.eq(username))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(AdminAccount::from))
    }

    async fn find_by_external_subject(
        &self,
        subject: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admins::table
            .filter(admins::external_subject.eq(subject))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(AdminAccount::from))
    }

    async fn exists(&self, id: &AdminId) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(admins::table.find(id.as_uuid())))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_if_absent(&self, account: &AdminAccount) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(admins::table)
            .values(AdminRow::from(account))
            .on_conflict(admins::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }
}
