//! Mock bill payments and receipts.

use chrono::{DateTime, Utc};

use super::bill::ServiceType;
use super::citizen::CitizenSummary;
use super::fixed_point::FixedPoint;
use super::ids::{BillId, CitizenId, PaymentId};
use super::labels::define_label_enum;
use super::ownership::Owned;
use super::reference_code::ReferenceCode;

define_label_enum! {
    /// Payment outcome. Mock payments are recorded as `success` directly.
    pub enum PaymentStatus ("payment status") {
        Pending => "pending",
        Success => "success",
        Failed => "failed",
    }
}

/// Stored payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: PaymentId,
    pub citizen_id: CitizenId,
    pub bill_id: BillId,
    pub amount: FixedPoint,
    pub payment_method: String,
    pub transaction_id: ReferenceCode,
    pub status: PaymentStatus,
    pub receipt_number: ReferenceCode,
    pub created_at: DateTime<Utc>,
}

impl Owned for Payment {
    fn owner(&self) -> Option<CitizenId> {
        Some(self.citizen_id)
    }
}

/// Everything needed to settle a bill atomically.
///
/// The amount is copied from the bill inside the settling transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub payment_id: PaymentId,
    pub citizen_id: CitizenId,
    pub bill_id: BillId,
    pub payment_method: String,
    pub transaction_id: ReferenceCode,
    pub receipt_number: ReferenceCode,
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// The payment row written once the bill amount is known.
    #[must_use]
    pub fn into_payment(self, amount: FixedPoint) -> Payment {
        Payment {
            id: self.payment_id,
            citizen_id: self.citizen_id,
            bill_id: self.bill_id,
            amount,
            payment_method: self.payment_method,
            transaction_id: self.transaction_id,
            status: PaymentStatus::Success,
            receipt_number: self.receipt_number,
            created_at: self.created_at,
        }
    }
}

/// Bill fields shown alongside a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSummary {
    pub service_type: ServiceType,
    pub bill_number: ReferenceCode,
    pub billing_period: Option<String>,
    pub consumer_number: Option<String>,
}

/// Payment joined with its bill (history, receipts) and citizen (receipts,
/// admin listings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub payment: Payment,
    pub bill: Option<BillSummary>,
    pub citizen: Option<CitizenSummary>,
    /// Citizen address, printed on receipts.
    pub citizen_address: Option<String>,
}

impl Owned for PaymentDetails {
    fn owner(&self) -> Option<CitizenId> {
        self.payment.owner()
    }
}
