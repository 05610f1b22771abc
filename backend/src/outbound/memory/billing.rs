//! Bills and payments.

use async_trait::async_trait;

use crate::domain::ports::{
    BillRepository, PaymentRepository, RecordStoreError, SettlementError,
};
use crate::domain::{
    Bill, BillFilter, BillId, BillStatus, BillSummary, BillWithCitizen, CitizenId, Payment,
    PaymentDetails, PaymentId, Settlement, sort_by_due_date,
};

use super::{InMemoryStore, StoreState, duplicate};

impl StoreState {
    fn payment_details(&self, payment: &Payment, with_citizen: bool) -> PaymentDetails {
        let bill = self
            .bills
            .iter()
            .find(|bill| bill.id == payment.bill_id)
            .map(|bill| BillSummary {
                service_type: bill.service_type,
                bill_number: bill.bill_number.clone(),
                billing_period: bill.billing_period.clone(),
                consumer_number: bill.consumer_number.clone(),
            });
        let owner = with_citizen
            .then(|| self.citizen(&payment.citizen_id))
            .flatten();
        PaymentDetails {
            payment: payment.clone(),
            bill,
            citizen: owner.map(Into::into),
            citizen_address: owner.and_then(|citizen| citizen.address.clone()),
        }
    }

    fn newest_payments(&self, filter: impl Fn(&Payment) -> bool) -> Vec<&Payment> {
        let mut payments: Vec<&Payment> = self
            .payments
            .iter()
            .filter(|payment| filter(payment))
            .collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        payments
    }
}

#[async_trait]
impl BillRepository for InMemoryStore {
    async fn insert(&self, bill: &Bill) -> Result<(), RecordStoreError> {
        let mut state = self.state.lock().await;
        if state
            .bills
            .iter()
            .any(|existing| existing.bill_number == bill.bill_number)
        {
            return Err(duplicate(bill.bill_number.as_str()));
        }
        state.bills.push(bill.clone());
        Ok(())
    }

    async fn find(&self, id: &BillId) -> Result<Option<Bill>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state.bills.iter().find(|bill| bill.id == *id).cloned())
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
        filter: BillFilter,
    ) -> Result<Vec<Bill>, RecordStoreError> {
        let state = self.state.lock().await;
        let mut bills: Vec<Bill> = state
            .bills
            .iter()
            .filter(|bill| bill.citizen_id == *citizen && filter.admits(bill.status))
            .cloned()
            .collect();
        sort_by_due_date(&mut bills);
        Ok(bills)
    }

    async fn list_all(&self) -> Result<Vec<BillWithCitizen>, RecordStoreError> {
        let state = self.state.lock().await;
        let mut bills = state.bills.clone();
        bills.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bills
            .into_iter()
            .map(|bill| BillWithCitizen {
                citizen: state.citizen_summary(&bill.citizen_id),
                bill,
            })
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn settle(&self, settlement: &Settlement) -> Result<Payment, SettlementError> {
        let mut state = self.state.lock().await;
        let reference_taken = state.payments.iter().any(|payment| {
            payment.transaction_id == settlement.transaction_id
                || payment.receipt_number == settlement.receipt_number
        });
        if reference_taken {
            return Err(SettlementError::duplicate_reference(
                settlement.transaction_id.as_str(),
            ));
        }

        let bill = state
            .bills
            .iter_mut()
            .find(|bill| bill.id == settlement.bill_id && bill.citizen_id == settlement.citizen_id)
            .ok_or(SettlementError::BillNotFound)?;
        if bill.status == BillStatus::Paid {
            return Err(SettlementError::BillAlreadyPaid);
        }
        bill.status = BillStatus::Paid;
        let payment = settlement.clone().into_payment(bill.amount);
        state.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_details(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentDetails>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .payments
            .iter()
            .find(|payment| payment.id == *id)
            .map(|payment| state.payment_details(payment, true)))
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<PaymentDetails>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .newest_payments(|payment| payment.citizen_id == *citizen)
            .into_iter()
            .map(|payment| state.payment_details(payment, false))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<PaymentDetails>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .newest_payments(|_| true)
            .into_iter()
            .map(|payment| state.payment_details(payment, true))
            .collect())
    }
}
