//! PostgreSQL-backed `AnnouncementRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AnnouncementRepository, RecordStoreError};
use crate::domain::{Announcement, AnnouncementId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AnnouncementRow, convert_all};
use super::pool::DbPool;
use super::schema::announcements;

/// Diesel implementation of the [`AnnouncementRepository`] port.
#[derive(Clone)]
pub struct DieselAnnouncementRepository {
    pool: DbPool,
}

impl DieselAnnouncementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnouncementRepository for DieselAnnouncementRepository {
    async fn insert(&self, announcement: &Announcement) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(announcements::table)
            .values(AnnouncementRow::from(announcement))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_visible(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Announcement>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = announcements::table
            .filter(announcements::is_active.eq(true))
            .filter(
                announcements::start_date
                    .is_null()
                    .or(announcements::start_date.le(now)),
            )
            .filter(
                announcements::end_date
                    .is_null()
                    .or(announcements::end_date.ge(now)),
            )
            .order(announcements::created_at.desc())
            .select(AnnouncementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_all(rows)
    }

    async fn list_all(&self) -> Result<Vec<Announcement>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = announcements::table
            .order(announcements::created_at.desc())
            .select(AnnouncementRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert_all(rows)
    }

    async fn deactivate(&self, id: &AnnouncementId) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let matched = diesel::update(announcements::table.find(id.as_uuid()))
            .set(announcements::is_active.eq(false))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(matched > 0)
    }
}
