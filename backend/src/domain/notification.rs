//! Notifications addressed to one citizen or broadcast to all of them.
//!
//! Targeted notifications carry their own read flag. Broadcasts are shared
//! rows, so each citizen's read state is kept as a separate receipt and
//! folded into `is_read` when the notification is listed for that citizen.

use chrono::{DateTime, Utc};

use super::ids::{CitizenId, NotificationId};
use super::labels::define_label_enum;
use super::ownership::Owned;

define_label_enum! {
    /// Notification category shown as an icon on the kiosk.
    pub enum NotificationKind ("notification type") {
        Alert => "alert",
        Notice => "notice",
        Emergency => "emergency",
        BillReminder => "bill_reminder",
        ServiceUpdate => "service_update",
    }
}

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// A single citizen.
    Citizen(CitizenId),
    /// Every citizen.
    Everyone,
}

/// Notification as seen by one reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub audience: Audience,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Read state for the citizen the notification was loaded for.
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Targeted recipient, if any.
    #[must_use]
    pub const fn citizen_id(&self) -> Option<CitizenId> {
        match self.audience {
            Audience::Citizen(id) => Some(id),
            Audience::Everyone => None,
        }
    }

    /// True for broadcasts.
    #[must_use]
    pub const fn target_all(&self) -> bool {
        matches!(self.audience, Audience::Everyone)
    }
}

impl Owned for Notification {
    fn owner(&self) -> Option<CitizenId> {
        self.citizen_id()
    }
}

/// Administrator input for a new notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub audience: Audience,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
}

impl NotificationDraft {
    /// Materialise the draft as an unread notification.
    #[must_use]
    pub fn into_notification(self, id: NotificationId, now: DateTime<Utc>) -> Notification {
        Notification {
            id,
            audience: self.audience,
            title: self.title,
            message: self.message,
            kind: self.kind,
            is_read: false,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Principal, ownership::is_visible_to};

    #[test]
    fn broadcasts_are_visible_to_every_citizen() {
        let draft = NotificationDraft {
            audience: Audience::Everyone,
            title: "Water outage".into(),
            message: "Supply resumes at 6pm".into(),
            kind: NotificationKind::Alert,
        };
        let notification = draft.into_notification(NotificationId::random(), Utc::now());
        assert!(notification.target_all());
        assert!(is_visible_to(
            &notification,
            &Principal::citizen(CitizenId::random())
        ));
    }

    #[test]
    fn targeted_notifications_are_private() {
        let owner = CitizenId::random();
        let draft = NotificationDraft {
            audience: Audience::Citizen(owner),
            title: "Bill due".into(),
            message: "Your bill is due tomorrow".into(),
            kind: NotificationKind::BillReminder,
        };
        let notification = draft.into_notification(NotificationId::random(), Utc::now());
        assert!(is_visible_to(&notification, &Principal::citizen(owner)));
        assert!(!is_visible_to(
            &notification,
            &Principal::citizen(CitizenId::random())
        ));
    }
}
