//! Driving port for notifications.

use async_trait::async_trait;

use crate::domain::{CitizenId, Error, Notification, NotificationDraft, NotificationId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// The caller's notifications plus broadcasts, newest first.
    async fn list_notifications(&self, citizen: &CitizenId) -> Result<Vec<Notification>, Error>;

    /// Mark a notification read for the caller. Idempotent.
    async fn mark_read(&self, citizen: &CitizenId, id: &NotificationId) -> Result<(), Error>;

    /// Send a targeted or broadcast notification (administrators).
    async fn send(&self, draft: NotificationDraft) -> Result<Notification, Error>;
}
