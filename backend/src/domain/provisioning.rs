//! Idempotent citizen provisioning.
//!
//! Token verification never writes; the first successful login of an unknown
//! identity is turned into an account here, in one explicit step.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{CitizenRepository, RecordStoreError};
use crate::domain::{Citizen, CitizenId, CitizenIdentity, CitizenLookup, Error, Provisioned};

/// Creates citizen accounts on first login.
pub struct CitizenProvisioner<R> {
    citizens: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> Clone for CitizenProvisioner<R> {
    fn clone(&self) -> Self {
        Self {
            citizens: Arc::clone(&self.citizens),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R> CitizenProvisioner<R>
where
    R: CitizenRepository,
{
    /// Create a provisioner writing to `citizens`.
    pub fn new(citizens: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { citizens, clock }
    }

    /// Return the account for `identity`, creating it when absent.
    ///
    /// Calling this twice for the same identity yields the same account. An
    /// external identity whose phone claim already belongs to another citizen
    /// is provisioned without a mobile number.
    pub async fn ensure_citizen_record(
        &self,
        identity: CitizenIdentity,
    ) -> Result<Provisioned, Error> {
        if let Some(citizen) = self
            .citizens
            .find_by_lookup(&identity.lookup)
            .await
            .map_err(|err| err.into_domain("citizen"))?
        {
            return Ok(Provisioned {
                citizen,
                created: false,
            });
        }

        let lookup = identity.lookup.clone();
        let candidate = identity.into_citizen(CitizenId::random(), self.clock.utc());
        let inserted = self.citizens.insert_if_absent(&candidate, &lookup).await;
        let provisioned = match inserted {
            Err(RecordStoreError::MobileTaken { mobile })
                if matches!(lookup, CitizenLookup::ExternalSubject(_)) =>
            {
                warn!(%mobile, "phone claim already registered; provisioning without mobile");
                self.insert_without_mobile(candidate, &lookup).await?
            }
            other => other.map_err(|err| err.into_domain("citizen"))?,
        };
        if provisioned.created {
            info!(citizen_id = %provisioned.citizen.id, "account provisioned");
        }
        Ok(provisioned)
    }

    async fn insert_without_mobile(
        &self,
        candidate: Citizen,
        lookup: &CitizenLookup,
    ) -> Result<Provisioned, Error> {
        let candidate = Citizen {
            mobile: String::new(),
            ..candidate
        };
        self.citizens
            .insert_if_absent(&candidate, lookup)
            .await
            .map_err(|err| err.into_domain("citizen"))
    }
}
