//! Mock bill payments.
//!
//! Payments always succeed at the gateway; the only failure modes are a
//! missing bill, an already settled bill, and storage faults.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{PaymentRepository, PaymentRequest, PaymentService, SettlementError};
use crate::domain::reference_code::{
    ReferenceAllocationError, ReferenceCodeGenerator, ReferenceKind, retry_on_reference_collision,
};
use crate::domain::{
    CitizenId, Error, Payment, PaymentDetails, PaymentId, Principal, Settlement, ensure_visible,
};

/// Payment service implementing the [`PaymentService`] driving port.
pub struct PaymentDesk<P> {
    payments: Arc<P>,
    codes: Arc<dyn ReferenceCodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl<P> PaymentDesk<P> {
    /// Create the service.
    pub fn new(
        payments: Arc<P>,
        codes: Arc<dyn ReferenceCodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            payments,
            codes,
            clock,
        }
    }

    fn map_settlement_error(err: ReferenceAllocationError<SettlementError>) -> Error {
        match err {
            ReferenceAllocationError::Repository(SettlementError::BillNotFound) => {
                Error::not_found("Bill not found")
            }
            ReferenceAllocationError::Repository(SettlementError::BillAlreadyPaid) => {
                Error::invalid_state("Bill already paid")
            }
            ReferenceAllocationError::Repository(SettlementError::Connection { message }) => {
                error!(error = %message, "payment store unreachable");
                Error::service_unavailable("payment repository unavailable")
            }
            ReferenceAllocationError::Repository(
                other @ (SettlementError::Query { .. }
                | SettlementError::DuplicateReference { .. }),
            ) => {
                error!(error = %other, "payment settlement failed");
                Error::internal("payment repository error")
            }
            ReferenceAllocationError::Exhausted { label } => {
                error!(record = label, "reference code space exhausted");
                Error::internal("could not allocate a payment reference")
            }
        }
    }
}

#[async_trait]
impl<P> PaymentService for PaymentDesk<P>
where
    P: PaymentRepository,
{
    async fn pay(&self, citizen: &CitizenId, request: PaymentRequest) -> Result<Payment, Error> {
        let created_at = self.clock.utc();
        let payment = retry_on_reference_collision("payment", || {
            let settlement = Settlement {
                payment_id: PaymentId::random(),
                citizen_id: *citizen,
                bill_id: request.bill_id,
                payment_method: request.payment_method.clone(),
                transaction_id: self.codes.generate(ReferenceKind::Transaction),
                receipt_number: self.codes.generate(ReferenceKind::Receipt),
                created_at,
            };
            async move { self.payments.settle(&settlement).await }
        })
        .await
        .map_err(Self::map_settlement_error)?;

        info!(
            payment_id = %payment.id,
            bill_id = %payment.bill_id,
            transaction_id = %payment.transaction_id,
            "payment settled"
        );
        Ok(payment)
    }

    async fn history(&self, citizen: &CitizenId) -> Result<Vec<PaymentDetails>, Error> {
        self.payments
            .list_for_citizen(citizen)
            .await
            .map_err(|err| err.into_domain("payment"))
    }

    async fn receipt(
        &self,
        principal: &Principal,
        id: &PaymentId,
    ) -> Result<PaymentDetails, Error> {
        let found = self
            .payments
            .find_details(id)
            .await
            .map_err(|err| err.into_domain("payment"))?;
        ensure_visible(found, principal, "Receipt not found")
    }

    async fn list_all_payments(&self) -> Result<Vec<PaymentDetails>, Error> {
        self.payments
            .list_all()
            .await
            .map_err(|err| err.into_domain("payment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPaymentRepository;
    use crate::domain::reference_code::RandomReferenceCodes;
    use crate::domain::test_clock::fixture_clock;
    use crate::domain::{BillId, ErrorCode, FixedPoint};
    use rstest::rstest;

    fn desk(repo: MockPaymentRepository) -> PaymentDesk<MockPaymentRepository> {
        PaymentDesk::new(Arc::new(repo), Arc::new(RandomReferenceCodes), fixture_clock())
    }

    fn request() -> PaymentRequest {
        PaymentRequest {
            bill_id: BillId::random(),
            payment_method: "upi".into(),
        }
    }

    #[tokio::test]
    async fn successful_settlement_returns_payment() {
        let mut repo = MockPaymentRepository::new();
        repo.expect_settle()
            .times(1)
            .returning(|settlement| {
                Ok(settlement
                    .clone()
                    .into_payment(FixedPoint::from_hundredths(49_999)))
            });
        let citizen = CitizenId::random();
        let payment = desk(repo).pay(&citizen, request()).await.expect("paid");
        assert_eq!(payment.citizen_id, citizen);
        assert_eq!(payment.amount.to_string(), "499.99");
        assert!(payment.transaction_id.as_str().starts_with("TXN"));
        assert!(payment.receipt_number.as_str().starts_with("RCP"));
    }

    #[rstest]
    #[case(SettlementError::BillNotFound, ErrorCode::NotFound, "Bill not found")]
    #[case(SettlementError::BillAlreadyPaid, ErrorCode::InvalidState, "Bill already paid")]
    #[case(
        SettlementError::connection("refused"),
        ErrorCode::ServiceUnavailable,
        "payment repository unavailable"
    )]
    #[case(SettlementError::query("boom"), ErrorCode::InternalError, "payment repository error")]
    #[tokio::test]
    async fn settlement_failures_map_to_domain_errors(
        #[case] failure: SettlementError,
        #[case] code: ErrorCode,
        #[case] detail: &str,
    ) {
        let mut repo = MockPaymentRepository::new();
        repo.expect_settle()
            .times(1)
            .return_once(move |_| Err(failure));
        let err = desk(repo)
            .pay(&CitizenId::random(), request())
            .await
            .expect_err("settlement fails");
        assert_eq!(err.code(), code);
        assert_eq!(err.detail(), detail);
    }

    #[tokio::test]
    async fn reference_collisions_draw_new_codes() {
        let mut repo = MockPaymentRepository::new();
        let mut seq = mockall::Sequence::new();
        repo.expect_settle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(SettlementError::duplicate_reference("transaction_id")));
        repo.expect_settle()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|settlement| Ok(settlement.clone().into_payment(FixedPoint::ZERO)));
        desk(repo)
            .pay(&CitizenId::random(), request())
            .await
            .expect("second attempt succeeds");
    }
}
