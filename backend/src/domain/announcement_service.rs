//! Public service announcements.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{AnnouncementRepository, AnnouncementService};
use crate::domain::{AdminId, Announcement, AnnouncementDraft, AnnouncementId, Error};

/// Service implementing the [`AnnouncementService`] driving port.
pub struct AnnouncementBoard<R> {
    announcements: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AnnouncementBoard<R> {
    /// Create the service.
    pub fn new(announcements: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            announcements,
            clock,
        }
    }
}

#[async_trait]
impl<R> AnnouncementService for AnnouncementBoard<R>
where
    R: AnnouncementRepository,
{
    async fn list_visible(&self) -> Result<Vec<Announcement>, Error> {
        self.announcements
            .list_visible(self.clock.utc())
            .await
            .map_err(|err| err.into_domain("announcement"))
    }

    async fn list_all_announcements(&self) -> Result<Vec<Announcement>, Error> {
        self.announcements
            .list_all()
            .await
            .map_err(|err| err.into_domain("announcement"))
    }

    async fn create(
        &self,
        author: &AdminId,
        draft: AnnouncementDraft,
    ) -> Result<Announcement, Error> {
        if let (Some(start), Some(end)) = (draft.start_date, draft.end_date) {
            if end < start {
                return Err(Error::invalid_request("end_date must not precede start_date"));
            }
        }
        let announcement =
            draft.into_announcement(AnnouncementId::random(), Some(*author), self.clock.utc());
        self.announcements
            .insert(&announcement)
            .await
            .map_err(|err| err.into_domain("announcement"))?;
        info!(announcement_id = %announcement.id, kind = %announcement.kind, "announcement published");
        Ok(announcement)
    }

    async fn deactivate(&self, id: &AnnouncementId) -> Result<(), Error> {
        let found = self
            .announcements
            .deactivate(id)
            .await
            .map_err(|err| err.into_domain("announcement"))?;
        if !found {
            return Err(Error::not_found("Announcement not found"));
        }
        info!(announcement_id = %id, "announcement deactivated");
        Ok(())
    }
}
