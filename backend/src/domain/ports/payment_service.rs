//! Driving port for payments.

use async_trait::async_trait;

use crate::domain::{BillId, CitizenId, Error, Payment, PaymentDetails, PaymentId, Principal};

/// Citizen request to pay a bill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub bill_id: BillId,
    pub payment_method: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Pay one of the caller's bills in full.
    ///
    /// Unknown or foreign bills are `NotFound`; settled bills are
    /// `InvalidState` and write nothing.
    async fn pay(&self, citizen: &CitizenId, request: PaymentRequest) -> Result<Payment, Error>;

    /// The caller's payments with bill details, newest first.
    async fn history(&self, citizen: &CitizenId) -> Result<Vec<PaymentDetails>, Error>;

    /// Receipt for one payment, if visible to `principal`.
    async fn receipt(&self, principal: &Principal, id: &PaymentId)
    -> Result<PaymentDetails, Error>;

    /// Every payment (administrators).
    async fn list_all_payments(&self) -> Result<Vec<PaymentDetails>, Error>;
}
