//! Bill listing and creation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{BillRepository, BillService, CitizenRepository, map_allocation_error};
use crate::domain::reference_code::{
    ReferenceCodeGenerator, ReferenceKind, retry_on_reference_collision,
};
use crate::domain::{
    Bill, BillDraft, BillFilter, BillId, BillWithCitizen, CitizenId, Error, Principal,
    ensure_visible,
};

/// Bill service implementing the [`BillService`] driving port.
pub struct BillLedger<B, C> {
    bills: Arc<B>,
    citizens: Arc<C>,
    codes: Arc<dyn ReferenceCodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl<B, C> BillLedger<B, C> {
    /// Create the service.
    pub fn new(
        bills: Arc<B>,
        citizens: Arc<C>,
        codes: Arc<dyn ReferenceCodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bills,
            citizens,
            codes,
            clock,
        }
    }
}

#[async_trait]
impl<B, C> BillService for BillLedger<B, C>
where
    B: BillRepository,
    C: CitizenRepository,
{
    async fn list_bills(
        &self,
        citizen: &CitizenId,
        filter: BillFilter,
    ) -> Result<Vec<Bill>, Error> {
        self.bills
            .list_for_citizen(citizen, filter)
            .await
            .map_err(|err| err.into_domain("bill"))
    }

    async fn bill(&self, principal: &Principal, id: &BillId) -> Result<Bill, Error> {
        let found = self
            .bills
            .find(id)
            .await
            .map_err(|err| err.into_domain("bill"))?;
        ensure_visible(found, principal, "Bill not found")
    }

    async fn list_all_bills(&self) -> Result<Vec<BillWithCitizen>, Error> {
        self.bills
            .list_all()
            .await
            .map_err(|err| err.into_domain("bill"))
    }

    async fn create_bill(&self, draft: BillDraft) -> Result<Bill, Error> {
        let owner_exists = self
            .citizens
            .find_by_id(&draft.citizen_id)
            .await
            .map_err(|err| err.into_domain("citizen"))?
            .is_some();
        if !owner_exists {
            return Err(Error::not_found("Citizen not found"));
        }

        let now = self.clock.utc();
        let bill = retry_on_reference_collision("bill", || {
            let bill = draft.clone().into_bill(
                BillId::random(),
                self.codes.generate(ReferenceKind::Bill),
                now,
            );
            async move { self.bills.insert(&bill).await.map(|()| bill) }
        })
        .await
        .map_err(|err| map_allocation_error(err, "bill"))?;

        info!(bill_id = %bill.id, bill_number = %bill.bill_number, "bill created");
        Ok(bill)
    }
}
