//! Notifications and announcements.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{AnnouncementRepository, NotificationRepository, RecordStoreError};
use crate::domain::{
    Announcement, AnnouncementId, CitizenId, Notification, NotificationId,
};

use super::{InMemoryStore, StoreState};

impl StoreState {
    fn as_read_by(&self, notification: &Notification, reader: &CitizenId) -> Notification {
        let mut view = notification.clone();
        view.is_read = self.read_receipts.contains_key(&(notification.id, *reader));
        view
    }
}

fn addressed_to(notification: &Notification, reader: &CitizenId) -> bool {
    notification
        .citizen_id()
        .is_none_or(|recipient| recipient == *reader)
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(&self, notification: &Notification) -> Result<(), RecordStoreError> {
        self.state
            .lock()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn list_for_citizen(
        &self,
        reader: &CitizenId,
    ) -> Result<Vec<Notification>, RecordStoreError> {
        let state = self.state.lock().await;
        let mut visible: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|notification| addressed_to(notification, reader))
            .map(|notification| state.as_read_by(notification, reader))
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(visible)
    }

    async fn find_for_reader(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
    ) -> Result<Option<Notification>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .notifications
            .iter()
            .find(|notification| notification.id == *id)
            .map(|notification| state.as_read_by(notification, reader)))
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        reader: &CitizenId,
        read_at: DateTime<Utc>,
    ) -> Result<(), RecordStoreError> {
        self.state
            .lock()
            .await
            .read_receipts
            .entry((*id, *reader))
            .or_insert(read_at);
        Ok(())
    }
}

fn newest_first(mut announcements: Vec<Announcement>) -> Vec<Announcement> {
    announcements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    announcements
}

#[async_trait]
impl AnnouncementRepository for InMemoryStore {
    async fn insert(&self, announcement: &Announcement) -> Result<(), RecordStoreError> {
        self.state.lock().await.announcements.push(announcement.clone());
        Ok(())
    }

    async fn list_visible(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Announcement>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .announcements
                .iter()
                .filter(|announcement| announcement.is_visible_at(now))
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self) -> Result<Vec<Announcement>, RecordStoreError> {
        Ok(newest_first(self.state.lock().await.announcements.clone()))
    }

    async fn deactivate(&self, id: &AnnouncementId) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        let Some(announcement) = state
            .announcements
            .iter_mut()
            .find(|announcement| announcement.id == *id)
        else {
            return Ok(false);
        };
        announcement.is_active = false;
        Ok(true)
    }
}
