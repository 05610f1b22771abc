//! PostgreSQL-backed `NotificationRepository`.
//!
//! Targeted notifications carry their own `is_read` flag. Broadcast reads
//! are recorded per citizen in `notification_reads`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{NotificationRepository, RecordStoreError};
use crate::domain::{CitizenId, Notification, NotificationId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNotificationReadRow, NotificationRow};
use super::pool::DbPool;
use super::schema::{notification_reads, notifications};

/// Diesel implementation of the [`NotificationRepository`] port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn broadcast_receipts(
    conn: &mut AsyncPgConnection,
    reader: &CitizenId,
    broadcast_ids: &[Uuid],
) -> Result<HashSet<Uuid>, RecordStoreError> {
    if broadcast_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let read: Vec<Uuid> = notification_reads::table
        .filter(notification_reads::citizen_id.eq(reader.as_uuid()))
        .filter(notification_reads::notification_id.eq_any(broadcast_ids))
        .select(notification_reads::notification_id)
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(read.into_iter().collect())
}

async fn find_row(
    conn: &mut AsyncPgConnection,
    id: &NotificationId,
) -> Result<Option<NotificationRow>, RecordStoreError> {
    notifications::table
        .find(id.as_uuid())
        .select(NotificationRow::as_select())
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(&self, notification: &Notification) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notifications::table)
            .values(NotificationRow::from(notification))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_citizen(
        &self,
        reader: &CitizenId,
    ) -> Result<Vec<Notification>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NotificationRow> = notifications::table
            .filter(
                notifications::citizen_id
                    .eq(reader.as_uuid())
                    .or(notifications::target_all.eq(true)),
            )
            .order(notifications::created_at.desc())
            .select(NotificationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let broadcast_ids: Vec<Uuid> = rows
            .iter()
            .filter(|row| row.target_all)
            .map(|row| row.id)
            .collect();
        let read = broadcast_receipts(&mut conn, reader, &broadcast_ids).await?;
        rows.into_iter()
            .map(|row| {
                let receipt = read.contains(&row.id);
                row.into_notification(receipt)
            })
            .collect()
    }

    async fn find_for_reader(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
    ) -> Result<Option<Notification>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = find_row(&mut conn, id).await? else {
            return Ok(None);
        };
        let receipt = if row.target_all {
            broadcast_receipts(&mut conn, reader, &[row.id])
                .await?
                .contains(&row.id)
        } else {
            false
        };
        row.into_notification(receipt).map(Some)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = find_row(&mut conn, id).await? else {
            return Ok(());
        };
        if row.target_all {
            diesel::insert_into(notification_reads::table)
                .values(NewNotificationReadRow {
                    notification_id: row.id,
                    citizen_id: *reader.as_uuid(),
                    read_at,
                })
                .on_conflict_do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        } else {
            diesel::update(
                notifications::table
                    .find(row.id)
                    .filter(notifications::citizen_id.eq(reader.as_uuid())),
            )
            .set(notifications::is_read.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        }
        Ok(())
    }
}
