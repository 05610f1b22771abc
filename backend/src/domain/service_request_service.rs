//! Service request filing and administration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ServiceRequestRepository, ServiceRequestService, map_allocation_error,
};
use crate::domain::reference_code::{
    ReferenceCodeGenerator, ReferenceKind, retry_on_reference_collision,
};
use crate::domain::{
    CitizenId, Error, Principal, ServiceRequest, ServiceRequestDraft, ServiceRequestId,
    ServiceRequestStatus, ServiceRequestUpdate, ServiceRequestWithCitizen, ensure_visible,
};

const NOT_FOUND: &str = "Service request not found";

/// Service implementing the [`ServiceRequestService`] driving port.
pub struct ServiceRequestDesk<R> {
    requests: Arc<R>,
    codes: Arc<dyn ReferenceCodeGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R> ServiceRequestDesk<R> {
    /// Create the service.
    pub fn new(
        requests: Arc<R>,
        codes: Arc<dyn ReferenceCodeGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            requests,
            codes,
            clock,
        }
    }
}

#[async_trait]
impl<R> ServiceRequestService for ServiceRequestDesk<R>
where
    R: ServiceRequestRepository,
{
    async fn submit(
        &self,
        citizen: &CitizenId,
        draft: ServiceRequestDraft,
    ) -> Result<ServiceRequest, Error> {
        let now = self.clock.utc();
        let request = retry_on_reference_collision("service request", || {
            let request = draft.clone().into_request(
                ServiceRequestId::random(),
                *citizen,
                self.codes.generate(ReferenceKind::ServiceRequest),
                now,
            );
            async move { self.requests.insert(&request).await.map(|()| request) }
        })
        .await
        .map_err(|err| map_allocation_error(err, "service request"))?;

        info!(
            request_id = %request.id,
            acknowledgment_number = %request.acknowledgment_number,
            "service request submitted"
        );
        Ok(request)
    }

    async fn list_requests(&self, citizen: &CitizenId) -> Result<Vec<ServiceRequest>, Error> {
        self.requests
            .list_for_citizen(citizen)
            .await
            .map_err(|err| err.into_domain("service request"))
    }

    async fn request(
        &self,
        principal: &Principal,
        id: &ServiceRequestId,
    ) -> Result<ServiceRequest, Error> {
        let found = self
            .requests
            .find(id)
            .await
            .map_err(|err| err.into_domain("service request"))?;
        ensure_visible(found, principal, NOT_FOUND)
    }

    async fn list_all_requests(&self) -> Result<Vec<ServiceRequestWithCitizen>, Error> {
        self.requests
            .list_all()
            .await
            .map_err(|err| err.into_domain("service request"))
    }

    async fn update_status(
        &self,
        principal: &Principal,
        id: &ServiceRequestId,
        status: ServiceRequestStatus,
        remarks: Option<String>,
    ) -> Result<(), Error> {
        self.request(principal, id).await?;
        let update = ServiceRequestUpdate {
            status,
            remarks,
            updated_at: self.clock.utc(),
        };
        let updated = self
            .requests
            .update(id, &update)
            .await
            .map_err(|err| err.into_domain("service request"))?;
        if !updated {
            return Err(Error::not_found(NOT_FOUND));
        }
        info!(request_id = %id, status = %status, "service request updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockServiceRequestRepository;
    use crate::domain::reference_code::RandomReferenceCodes;
    use crate::domain::test_clock::fixture_clock;
    use crate::domain::{ErrorCode, RequestType, Role};
    use uuid::Uuid;

    fn draft() -> ServiceRequestDraft {
        ServiceRequestDraft {
            request_type: RequestType::NewConnection,
            service_type: "water".into(),
            description: Some("New tap connection".into()),
            documents: None,
        }
    }

    fn desk(repo: MockServiceRequestRepository) -> ServiceRequestDesk<MockServiceRequestRepository> {
        ServiceRequestDesk::new(Arc::new(repo), Arc::new(RandomReferenceCodes), fixture_clock())
    }

    #[tokio::test]
    async fn submitted_requests_get_acknowledgment_numbers() {
        let mut repo = MockServiceRequestRepository::new();
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let citizen = CitizenId::random();
        let request = desk(repo).submit(&citizen, draft()).await.expect("filed");
        assert!(
            crate::domain::ReferenceKind::ServiceRequest
                .matches(request.acknowledgment_number.as_str())
        );
        assert_eq!(request.status, ServiceRequestStatus::Submitted);
        assert_eq!(request.citizen_id, citizen);
    }

    #[tokio::test]
    async fn admin_update_of_missing_request_is_not_found() {
        let mut repo = MockServiceRequestRepository::new();
        repo.expect_find().returning(|_| Ok(None));
        repo.expect_update().never();
        let admin = Principal::new(Uuid::new_v4(), Role::Admin);
        let err = desk(repo)
            .update_status(
                &admin,
                &ServiceRequestId::random(),
                ServiceRequestStatus::Approved,
                None,
            )
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.detail(), "Service request not found");
    }
}
