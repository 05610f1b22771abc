//! Utility bills raised by administrators and settled by citizens.

use chrono::{DateTime, NaiveDate, Utc};

use super::citizen::CitizenSummary;
use super::fixed_point::FixedPoint;
use super::ids::{BillId, CitizenId};
use super::labels::define_label_enum;
use super::ownership::Owned;
use super::reference_code::ReferenceCode;

define_label_enum! {
    /// Utility a bill or announcement relates to.
    pub enum ServiceType ("service type") {
        Electricity => "electricity",
        Gas => "gas",
        Water => "water",
        Sanitation => "sanitation",
    }
}

define_label_enum! {
    /// Bill lifecycle. Bills only become `paid` through a payment.
    pub enum BillStatus ("bill status") {
        Pending => "pending",
        Paid => "paid",
        Overdue => "overdue",
    }
}

impl BillStatus {
    /// Still awaiting payment.
    #[must_use]
    pub const fn is_outstanding(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

/// Which of a citizen's bills to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillFilter {
    /// Every bill.
    #[default]
    All,
    /// Pending or overdue bills.
    Outstanding,
}

impl BillFilter {
    /// Whether a bill with `status` passes the filter.
    #[must_use]
    pub const fn admits(self, status: BillStatus) -> bool {
        match self {
            Self::All => true,
            Self::Outstanding => status.is_outstanding(),
        }
    }
}

/// Stored bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    pub id: BillId,
    pub citizen_id: CitizenId,
    pub service_type: ServiceType,
    pub bill_number: ReferenceCode,
    pub amount: FixedPoint,
    pub due_date: NaiveDate,
    pub billing_period: Option<String>,
    pub status: BillStatus,
    pub consumer_number: Option<String>,
    pub meter_reading: Option<FixedPoint>,
    pub units_consumed: Option<FixedPoint>,
    pub created_at: DateTime<Utc>,
}

impl Owned for Bill {
    fn owner(&self) -> Option<CitizenId> {
        Some(self.citizen_id)
    }
}

/// Administrator input for a new bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillDraft {
    pub citizen_id: CitizenId,
    pub service_type: ServiceType,
    pub amount: FixedPoint,
    pub due_date: NaiveDate,
    pub billing_period: Option<String>,
    pub consumer_number: Option<String>,
    pub meter_reading: Option<FixedPoint>,
    pub units_consumed: Option<FixedPoint>,
}

impl BillDraft {
    /// Materialise the draft as a pending bill.
    #[must_use]
    pub fn into_bill(self, id: BillId, bill_number: ReferenceCode, now: DateTime<Utc>) -> Bill {
        Bill {
            id,
            citizen_id: self.citizen_id,
            service_type: self.service_type,
            bill_number,
            amount: self.amount,
            due_date: self.due_date,
            billing_period: self.billing_period,
            status: BillStatus::Pending,
            consumer_number: self.consumer_number,
            meter_reading: self.meter_reading,
            units_consumed: self.units_consumed,
            created_at: now,
        }
    }
}

/// Bill joined with its citizen for admin listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillWithCitizen {
    pub bill: Bill,
    pub citizen: CitizenSummary,
}

/// Sort citizen bill listings: earliest due date first.
pub fn sort_by_due_date(bills: &mut [Bill]) {
    bills.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BillStatus::Pending, true)]
    #[case(BillStatus::Overdue, true)]
    #[case(BillStatus::Paid, false)]
    fn outstanding_filter(#[case] status: BillStatus, #[case] admitted: bool) {
        assert_eq!(BillFilter::Outstanding.admits(status), admitted);
        assert!(BillFilter::All.admits(status));
    }

    #[test]
    fn unknown_service_type_is_rejected() {
        let err = "internet".parse::<ServiceType>().expect_err("not a utility");
        assert_eq!(err.kind(), "service type");
    }
}
