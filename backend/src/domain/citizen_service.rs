//! Citizen profile service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{CitizenRepository, CitizenService};
use crate::domain::{Citizen, CitizenId, CitizenProfile, Error};

const CITIZEN_NOT_FOUND: &str = "Citizen not found";

/// Citizen service implementing the [`CitizenService`] driving port.
pub struct CitizenAccounts<R> {
    citizens: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> CitizenAccounts<R> {
    /// Create the service over `citizens`.
    pub fn new(citizens: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { citizens, clock }
    }
}

#[async_trait]
impl<R> CitizenService for CitizenAccounts<R>
where
    R: CitizenRepository,
{
    async fn profile(&self, citizen: &CitizenId) -> Result<Citizen, Error> {
        self.citizens
            .find_by_id(citizen)
            .await
            .map_err(|err| err.into_domain("citizen"))?
            .ok_or_else(|| Error::not_found(CITIZEN_NOT_FOUND))
    }

    async fn update_profile(
        &self,
        citizen: &CitizenId,
        profile: &CitizenProfile,
    ) -> Result<(), Error> {
        let updated = self
            .citizens
            .update_profile(citizen, profile, self.clock.utc())
            .await
            .map_err(|err| err.into_domain("citizen"))?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found(CITIZEN_NOT_FOUND))
        }
    }

    async fn list_citizens(&self) -> Result<Vec<Citizen>, Error> {
        self.citizens
            .list_all()
            .await
            .map_err(|err| err.into_domain("citizen"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockCitizenRepository, RecordStoreError};
    use crate::domain::test_clock::fixture_clock;

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mut repo = MockCitizenRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = CitizenAccounts::new(Arc::new(repo), fixture_clock());
        let err = service
            .profile(&CitizenId::random())
            .await
            .expect_err("absent");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.detail(), "Citizen not found");
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let mut repo = MockCitizenRepository::new();
        repo.expect_update_profile()
            .returning(|_, _, _| Err(RecordStoreError::connection("refused")));
        let service = CitizenAccounts::new(Arc::new(repo), fixture_clock());
        let err = service
            .update_profile(&CitizenId::random(), &CitizenProfile::default())
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
