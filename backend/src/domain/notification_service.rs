//! Citizen notifications and broadcasts.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{CitizenRepository, NotificationRepository, NotificationService};
use crate::domain::{
    Audience, CitizenId, Error, Notification, NotificationDraft, NotificationId, Principal,
    ensure_visible,
};

/// Service implementing the [`NotificationService`] driving port.
pub struct NotificationCentre<N, C> {
    notifications: Arc<N>,
    citizens: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<N, C> NotificationCentre<N, C> {
    /// Create the service.
    pub fn new(notifications: Arc<N>, citizens: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            citizens,
            clock,
        }
    }
}

#[async_trait]
impl<N, C> NotificationService for NotificationCentre<N, C>
where
    N: NotificationRepository,
    C: CitizenRepository,
{
    async fn list_notifications(&self, citizen: &CitizenId) -> Result<Vec<Notification>, Error> {
        self.notifications
            .list_for_citizen(citizen)
            .await
            .map_err(|err| err.into_domain("notification"))
    }

    async fn mark_read(&self, citizen: &CitizenId, id: &NotificationId) -> Result<(), Error> {
        let found = self
            .notifications
            .find_for_reader(id, citizen)
            .await
            .map_err(|err| err.into_domain("notification"))?;
        ensure_visible(found, &Principal::citizen(*citizen), "Notification not found")?;
        self.notifications
            .mark_read(id, citizen, self.clock.utc())
            .await
            .map_err(|err| err.into_domain("notification"))
    }

    async fn send(&self, draft: NotificationDraft) -> Result<Notification, Error> {
        if let Audience::Citizen(target) = draft.audience {
            let known = self
                .citizens
                .find_by_id(&target)
                .await
                .map_err(|err| err.into_domain("citizen"))?;
            if known.is_none() {
                return Err(Error::not_found("Citizen not found"));
            }
        }
        let notification = draft.into_notification(NotificationId::random(), self.clock.utc());
        self.notifications
            .insert(&notification)
            .await
            .map_err(|err| err.into_domain("notification"))?;
        info!(
            notification_id = %notification.id,
            broadcast = notification.target_all(),
            "notification sent"
        );
        Ok(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCitizenRepository, MockNotificationRepository};
    use crate::domain::test_clock::{fixture_clock, fixture_timestamp};
    use crate::domain::{ErrorCode, NotificationKind};

    fn draft(audience: Audience) -> NotificationDraft {
        NotificationDraft {
            audience,
            title: "Water supply".into(),
            message: "Supply restored".into(),
            kind: NotificationKind::Notice,
        }
    }

    fn centre(
        notifications: MockNotificationRepository,
        citizens: MockCitizenRepository,
    ) -> NotificationCentre<MockNotificationRepository, MockCitizenRepository> {
        NotificationCentre::new(Arc::new(notifications), Arc::new(citizens), fixture_clock())
    }

    #[tokio::test]
    async fn broadcasts_skip_citizen_lookup() {
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert().times(1).returning(|_| Ok(()));
        let mut citizens = MockCitizenRepository::new();
        citizens.expect_find_by_id().never();
        let sent = centre(notifications, citizens)
            .send(draft(Audience::Everyone))
            .await
            .expect("sent");
        assert!(sent.target_all());
        assert!(!sent.is_read);
    }

    #[tokio::test]
    async fn targeted_notification_for_unknown_citizen_is_not_found() {
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_insert().never();
        let mut citizens = MockCitizenRepository::new();
        citizens.expect_find_by_id().returning(|_| Ok(None));
        let err = centre(notifications, citizens)
            .send(draft(Audience::Citizen(CitizenId::random())))
            .await
            .expect_err("unknown citizen");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.detail(), "Citizen not found");
    }

    #[tokio::test]
    async fn marking_another_citizens_notification_is_not_found() {
        let owner = CitizenId::random();
        let reader = CitizenId::random();
        let stored = draft(Audience::Citizen(owner))
            .into_notification(NotificationId::random(), fixture_timestamp());
        let id = stored.id;
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_for_reader()
            .return_once(move |_, _| Ok(Some(stored)));
        notifications.expect_mark_read().never();
        let err = centre(notifications, MockCitizenRepository::new())
            .mark_read(&reader, &id)
            .await
            .expect_err("foreign notification");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn broadcasts_can_be_marked_read_by_any_citizen() {
        let stored = draft(Audience::Everyone)
            .into_notification(NotificationId::random(), fixture_timestamp());
        let id = stored.id;
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_for_reader()
            .return_once(move |_, _| Ok(Some(stored)));
        notifications
            .expect_mark_read()
            .withf(|_, _, read_at| *read_at == fixture_timestamp())
            .times(1)
            .returning(|_, _, _| Ok(()));
        centre(notifications, MockCitizenRepository::new())
            .mark_read(&CitizenId::random(), &id)
            .await
            .expect("marked");
    }
}
