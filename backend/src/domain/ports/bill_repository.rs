//! Port abstraction for bill storage.

use async_trait::async_trait;

use crate::domain::{Bill, BillFilter, BillId, BillWithCitizen, CitizenId};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillRepository: Send + Sync {
    /// Insert a new bill. A taken bill number yields
    /// [`RecordStoreError::DuplicateReference`].
    async fn insert(&self, bill: &Bill) -> Result<(), RecordStoreError>;

    /// Fetch a bill by identifier regardless of owner.
    async fn find(&self, id: &BillId) -> Result<Option<Bill>, RecordStoreError>;

    /// A citizen's bills passing `filter`, earliest due date first.
    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
        filter: BillFilter,
    ) -> Result<Vec<Bill>, RecordStoreError>;

    /// Every bill with its citizen's name and mobile, newest first.
    async fn list_all(&self) -> Result<Vec<BillWithCitizen>, RecordStoreError>;
}
