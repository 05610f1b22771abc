//! Public announcements such as planned outages.

use chrono::{DateTime, NaiveDate, Utc};

use super::ids::{AdminId, AnnouncementId};
use super::labels::define_label_enum;

define_label_enum! {
    /// Announcement category.
    pub enum AnnouncementKind ("announcement type") {
        Maintenance => "maintenance",
        Outage => "outage",
        Emergency => "emergency",
        General => "general",
    }
}

/// Stored announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub message: String,
    pub kind: AnnouncementKind,
    pub service_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_by: Option<AdminId>,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    /// Active and inside its (inclusive) window at `now`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, Utc};
    /// use suvidha::domain::{Announcement, AnnouncementId, AnnouncementKind};
    ///
    /// let now = Utc::now();
    /// let announcement = Announcement {
    ///     id: AnnouncementId::random(),
    ///     title: "Outage".into(),
    ///     message: "Ward 4".into(),
    ///     kind: AnnouncementKind::Outage,
    ///     service_type: None,
    ///     start_date: Some(now + Duration::hours(1)),
    ///     end_date: None,
    ///     is_active: true,
    ///     created_by: None,
    ///     created_at: now,
    /// };
    /// assert!(!announcement.is_visible_at(now));
    /// ```
    #[must_use]
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| end >= now)
    }
}

/// Administrator input for a new announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub title: String,
    pub message: String,
    pub kind: AnnouncementKind,
    pub service_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl AnnouncementDraft {
    /// Materialise the draft as an active announcement.
    #[must_use]
    pub fn into_announcement(
        self,
        id: AnnouncementId,
        created_by: Option<AdminId>,
        now: DateTime<Utc>,
    ) -> Announcement {
        Announcement {
            id,
            title: self.title,
            message: self.message,
            kind: self.kind,
            service_type: self.service_type,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: true,
            created_by,
            created_at: now,
        }
    }
}

/// Parse an announcement window bound.
///
/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates, which are taken
/// as midnight UTC.
pub fn parse_window_bound(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
