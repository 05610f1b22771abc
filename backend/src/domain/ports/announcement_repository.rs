//! Port abstraction for announcement storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Announcement, AnnouncementId};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementRepository: Send + Sync {
    /// Insert a new announcement.
    async fn insert(&self, announcement: &Announcement) -> Result<(), RecordStoreError>;

    /// Active announcements whose window contains `now`, newest first.
    async fn list_visible(&self, now: DateTime<Utc>)
    -> Result<Vec<Announcement>, RecordStoreError>;

    /// Every announcement, newest first.
    async fn list_all(&self) -> Result<Vec<Announcement>, RecordStoreError>;

    /// Clear `is_active`. Returns `false` when the announcement is absent.
    async fn deactivate(&self, id: &AnnouncementId) -> Result<bool, RecordStoreError>;
}
