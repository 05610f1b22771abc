//! Port abstraction for payments and the bill settlement transaction.

use async_trait::async_trait;

use crate::domain::reference_code::ReferenceCollision;
use crate::domain::{CitizenId, Payment, PaymentDetails, PaymentId, Settlement};

use super::{RecordStoreError, define_port_error};

define_port_error! {
    /// Failures raised while settling a bill.
    pub enum SettlementError {
        /// No bill with this id belongs to the paying citizen.
        BillNotFound => "bill not found for citizen",
        /// The bill was already settled; no payment was written.
        BillAlreadyPaid => "bill already paid",
        /// The transaction id or receipt number is already taken.
        DuplicateReference { message: String } => "payment reference already in use: {message}",
        /// The store could not be reached.
        Connection { message: String } => "payment store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "payment store query failed: {message}",
    }
}

impl ReferenceCollision for SettlementError {
    fn is_reference_collision(&self) -> bool {
        matches!(self, Self::DuplicateReference { .. })
    }
}

impl From<RecordStoreError> for SettlementError {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::Connection { message } => Self::Connection { message },
            RecordStoreError::Query { message } => Self::Query { message },
            RecordStoreError::MobileTaken { mobile } => Self::Query {
                message: format!("unexpected mobile clash on {mobile}"),
            },
            RecordStoreError::DuplicateReference { message } => {
                Self::DuplicateReference { message }
            }
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Settle a bill in one atomic step.
    ///
    /// The bill must belong to `settlement.citizen_id` and not yet be paid.
    /// The bill is switched to `paid` with a conditional update and the
    /// payment row (carrying the bill's amount) is written in the same
    /// transaction, so concurrent attempts on one bill settle it once.
    async fn settle(&self, settlement: &Settlement) -> Result<Payment, SettlementError>;

    /// Fetch a payment joined with its bill and citizen.
    async fn find_details(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentDetails>, RecordStoreError>;

    /// A citizen's payments joined with their bills, newest first.
    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<PaymentDetails>, RecordStoreError>;

    /// Every payment joined with bill and citizen, newest first.
    async fn list_all(&self) -> Result<Vec<PaymentDetails>, RecordStoreError>;
}
