//! Driving port for bills.

use async_trait::async_trait;

use crate::domain::{
    Bill, BillDraft, BillFilter, BillId, BillWithCitizen, CitizenId, Error, Principal,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillService: Send + Sync {
    /// A citizen's bills, earliest due date first.
    async fn list_bills(&self, citizen: &CitizenId, filter: BillFilter)
    -> Result<Vec<Bill>, Error>;

    /// One bill, if visible to `principal`.
    async fn bill(&self, principal: &Principal, id: &BillId) -> Result<Bill, Error>;

    /// Every bill with citizen name and mobile (administrators).
    async fn list_all_bills(&self) -> Result<Vec<BillWithCitizen>, Error>;

    /// Raise a new pending bill (administrators).
    async fn create_bill(&self, draft: BillDraft) -> Result<Bill, Error>;
}
