//! Driving port for announcements.

use async_trait::async_trait;

use crate::domain::{AdminId, Announcement, AnnouncementDraft, AnnouncementId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnnouncementService: Send + Sync {
    /// Active announcements inside their window, newest first (public).
    async fn list_visible(&self) -> Result<Vec<Announcement>, Error>;

    /// Every announcement, newest first (administrators).
    async fn list_all_announcements(&self) -> Result<Vec<Announcement>, Error>;

    /// Publish an announcement (administrators).
    async fn create(
        &self,
        author: &AdminId,
        draft: AnnouncementDraft,
    ) -> Result<Announcement, Error>;

    /// Soft-delete an announcement. Idempotent.
    async fn deactivate(&self, id: &AnnouncementId) -> Result<(), Error>;
}
