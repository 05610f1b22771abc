//! PostgreSQL-backed `PaymentRepository`.
//!
//! Settlement flips the bill to `paid` with a conditional `UPDATE` and writes
//! the payment row in the same transaction. Row locking on the bill makes a
//! concurrent second attempt observe the first one's `paid` status.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PaymentRepository, RecordStoreError, SettlementError};
use crate::domain::{
    BillStatus, BillSummary, CitizenId, CitizenSummary, FixedPoint, Payment, PaymentDetails,
    PaymentId, ReferenceCode, Settlement,
};

use super::error_mapping::{map_diesel_error, map_pool_error, parse_label};
use super::models::{PaymentRow, convert_all};
use super::pool::DbPool;
use super::schema::{bills, citizens, payments};

/// Diesel implementation of the [`PaymentRepository`] port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the settlement transaction. Either variant rolls it back.
enum SettleFailure {
    Rejected(SettlementError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for SettleFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

impl From<SettleFailure> for SettlementError {
    fn from(value: SettleFailure) -> Self {
        match value {
            SettleFailure::Rejected(err) => err,
            SettleFailure::Diesel(err) => map_diesel_error(err).into(),
        }
    }
}

async fn settle_in_transaction(
    conn: &mut AsyncPgConnection,
    settlement: &Settlement,
) -> Result<Payment, SettleFailure> {
    let owned_bill = bills::table
        .filter(bills::id.eq(settlement.bill_id.as_uuid()))
        .filter(bills::citizen_id.eq(settlement.citizen_id.as_uuid()));

    let unpaid = owned_bill
        .clone()
        .filter(bills::status.ne(BillStatus::Paid.as_str()));
    let amount: Option<i64> = diesel::update(unpaid)
        .set(bills::status.eq(BillStatus::Paid.as_str()))
        .returning(bills::amount_paise)
        .get_result(conn)
        .await
        .optional()?;

    let Some(amount) = amount else {
        let exists: bool = diesel::select(diesel::dsl::exists(owned_bill))
            .get_result(conn)
            .await?;
        return Err(SettleFailure::Rejected(if exists {
            SettlementError::BillAlreadyPaid
        } else {
            SettlementError::BillNotFound
        }));
    };

    let payment = settlement
        .clone()
        .into_payment(FixedPoint::from_hundredths(amount));
    diesel::insert_into(payments::table)
        .values(PaymentRow::from(&payment))
        .execute(conn)
        .await?;
    Ok(payment)
}

type BillSummaryRow = (Uuid, String, String, Option<String>, Option<String>);
type PayerRow = (Uuid, Option<String>, Option<String>, Option<String>);

/// Attach bill and, when `with_citizen`, payer details to each payment.
async fn attach_details(
    conn: &mut AsyncPgConnection,
    payments: Vec<Payment>,
    with_citizen: bool,
) -> Result<Vec<PaymentDetails>, RecordStoreError> {
    let bill_ids: Vec<Uuid> = payments.iter().map(|p| *p.bill_id.as_uuid()).collect();
    let bill_rows: Vec<BillSummaryRow> = if bill_ids.is_empty() {
        Vec::new()
    } else {
        bills::table
            .filter(bills::id.eq_any(&bill_ids))
            .select((
                bills::id,
                bills::service_type,
                bills::bill_number,
                bills::billing_period,
                bills::consumer_number,
            ))
            .load(conn)
            .await
            .map_err(map_diesel_error)?
    };
    let mut bill_summaries = HashMap::with_capacity(bill_rows.len());
    for (id, service_type, bill_number, billing_period, consumer_number) in bill_rows {
        bill_summaries.insert(
            id,
            BillSummary {
                service_type: parse_label("service type", &service_type)?,
                bill_number: ReferenceCode::from_stored(bill_number),
                billing_period,
                consumer_number,
            },
        );
    }

    let payers: HashMap<Uuid, PayerRow> = if with_citizen && !payments.is_empty() {
        let citizen_ids: Vec<Uuid> = payments.iter().map(|p| *p.citizen_id.as_uuid()).collect();
        let rows: Vec<PayerRow> = citizens::table
            .filter(citizens::id.eq_any(&citizen_ids))
            .select((citizens::id, citizens::name, citizens::mobile, citizens::address))
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(|row| (row.0, row)).collect()
    } else {
        HashMap::new()
    };

    Ok(payments
        .into_iter()
        .map(|payment| {
            let bill = bill_summaries.get(payment.bill_id.as_uuid()).cloned();
            let payer = payers.get(payment.citizen_id.as_uuid());
            PaymentDetails {
                bill,
                citizen: payer.map(|(_, name, mobile, _)| CitizenSummary {
                    name: name.clone(),
                    mobile: mobile.clone(),
                }),
                citizen_address: payer.and_then(|(_, _, _, address)| address.clone()),
                payment,
            }
        })
        .collect())
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn settle(&self, settlement: &Settlement) -> Result<Payment, SettlementError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| SettlementError::from(map_pool_error(err)))?;
        let payment = conn
            .transaction(|conn| {
                async move { settle_in_transaction(conn, settlement).await }.scope_boxed()
            })
            .await?;
        Ok(payment)
    }

    async fn find_details(
        &self,
        id: &PaymentId,
    ) -> Result<Option<PaymentDetails>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = payments::table
            .find(id.as_uuid())
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let payment = Payment::try_from(row)?;
        let mut details = attach_details(&mut conn, vec![payment], true).await?;
        Ok(details.pop())
    }

    async fn list_for_citizen(
        &self,
        citizen: &CitizenId,
    ) -> Result<Vec<PaymentDetails>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = payments::table
            .filter(payments::citizen_id.eq(citizen.as_uuid()))
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        attach_details(&mut conn, convert_all(rows)?, false).await
    }

    async fn list_all(&self) -> Result<Vec<PaymentDetails>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = payments::table
            .order(payments::created_at.desc())
            .select(PaymentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        attach_details(&mut conn, convert_all(rows)?, true).await
    }
}
