//! Port abstraction for notifications and broadcast read receipts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CitizenId, Notification, NotificationId};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Insert a new notification.
    async fn insert(&self, notification: &Notification) -> Result<(), RecordStoreError>;

    /// Notifications addressed to `reader` plus every broadcast, newest
    /// first, with `is_read` resolved for `reader`.
    async fn list_for_citizen(
        &self,
        reader: &CitizenId,
    ) -> Result<Vec<Notification>, RecordStoreError>;

    /// Fetch one notification with `is_read` resolved for `reader`.
    ///
    /// Returns targeted notifications of other citizens too; visibility is
    /// checked by the caller.
    async fn find_for_reader(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
    ) -> Result<Option<Notification>, RecordStoreError>;

    /// Record that `reader` has read the notification at `read_at`. Repeat
    /// calls are no-ops and keep the first read time.
    async fn mark_read(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RecordStoreError>;
}
