//! Citizen complaints and their resolution.

use chrono::{DateTime, Utc};

use super::citizen::CitizenSummary;
use super::ids::{CitizenId, ComplaintId};
use super::labels::define_label_enum;
use super::ownership::Owned;
use super::reference_code::ReferenceCode;

define_label_enum! {
    /// Department a complaint is routed to.
    pub enum ComplaintCategory ("complaint category") {
        Electricity => "electricity",
        Gas => "gas",
        Water => "water",
        Sanitation => "sanitation",
        Municipal => "municipal",
        Other => "other",
    }
}

define_label_enum! {
    /// Complaint lifecycle.
    pub enum ComplaintStatus ("complaint status") {
        Submitted => "submitted",
        InProgress => "in_progress",
        Resolved => "resolved",
        Closed => "closed",
        Rejected => "rejected",
    }
}

define_label_enum! {
    /// Triage priority; `medium` unless the citizen says otherwise.
    pub enum Priority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Stored complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub citizen_id: CitizenId,
    pub category: ComplaintCategory,
    pub subcategory: Option<String>,
    pub description: String,
    pub location: Option<String>,
    /// Opaque photo reference.
    pub photo: Option<String>,
    pub status: ComplaintStatus,
    pub complaint_number: ReferenceCode,
    pub priority: Priority,
    pub resolution_remarks: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Complaint {
    fn owner(&self) -> Option<CitizenId> {
        Some(self.citizen_id)
    }
}

/// Citizen input for a new complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub category: ComplaintCategory,
    pub subcategory: Option<String>,
    pub description: String,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub priority: Priority,
}

impl ComplaintDraft {
    /// Materialise the draft as a submitted complaint.
    #[must_use]
    pub fn into_complaint(
        self,
        id: ComplaintId,
        citizen_id: CitizenId,
        complaint_number: ReferenceCode,
        now: DateTime<Utc>,
    ) -> Complaint {
        Complaint {
            id,
            citizen_id,
            category: self.category,
            subcategory: self.subcategory,
            description: self.description,
            location: self.location,
            photo: self.photo,
            status: ComplaintStatus::Submitted,
            complaint_number,
            priority: self.priority,
            resolution_remarks: None,
            resolved_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Administrator status change.
///
/// `resolved_at` is stamped when the new status is `resolved` and cleared
/// for every other status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintUpdate {
    pub status: ComplaintStatus,
    pub resolution_remarks: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ComplaintUpdate {
    /// Build the change as of `now`.
    #[must_use]
    pub fn at(
        status: ComplaintStatus,
        resolution_remarks: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status,
            resolution_remarks,
            resolved_at: (status == ComplaintStatus::Resolved).then_some(now),
            updated_at: now,
        }
    }

    /// Apply the change to a stored complaint.
    pub fn apply_to(&self, complaint: &mut Complaint) {
        complaint.status = self.status;
        complaint
            .resolution_remarks
            .clone_from(&self.resolution_remarks);
        complaint.resolved_at = self.resolved_at;
        complaint.updated_at = self.updated_at;
    }
}

/// Complaint joined with its citizen for admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintWithCitizen {
    pub complaint: Complaint,
    pub citizen: CitizenSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(ComplaintStatus::Resolved, true)]
    #[case(ComplaintStatus::InProgress, false)]
    #[case(ComplaintStatus::Closed, false)]
    fn resolved_at_is_stamped_only_on_resolution(
        #[case] status: ComplaintStatus,
        #[case] stamped: bool,
    ) {
        let now = Utc
            .with_ymd_and_hms(2025, 2, 1, 9, 30, 0)
            .single()
            .expect("valid instant");
        let update = ComplaintUpdate::at(status, None, now);
        assert_eq!(update.resolved_at.is_some(), stamped);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
