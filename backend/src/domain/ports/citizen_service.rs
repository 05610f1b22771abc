//! Driving port for citizen profiles.

use async_trait::async_trait;

use crate::domain::{Citizen, CitizenId, CitizenProfile, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CitizenService: Send + Sync {
    /// The caller's own profile.
    async fn profile(&self, citizen: &CitizenId) -> Result<Citizen, Error>;

    /// Replace the caller's editable profile fields.
    async fn update_profile(
        &self,
        citizen: &CitizenId,
        profile: &CitizenProfile,
    ) -> Result<(), Error>;

    /// Every citizen, newest first (administrators).
    async fn list_citizens(&self) -> Result<Vec<Citizen>, Error>;
}
