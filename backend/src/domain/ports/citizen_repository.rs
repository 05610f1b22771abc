//! Port abstraction for citizen account storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Citizen, CitizenId, CitizenLookup, CitizenProfile, Provisioned};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CitizenRepository: Send + Sync {
    /// Fetch a citizen by identifier.
    async fn find_by_id(&self, id: &CitizenId) -> Result<Option<Citizen>, RecordStoreError>;

    /// Fetch a citizen by login handle.
    async fn find_by_lookup(
        &self,
        lookup: &CitizenLookup,
    ) -> Result<Option<Citizen>, RecordStoreError>;

    /// Insert `candidate` unless a citizen already matches `lookup`.
    ///
    /// Returns the stored account either way; concurrent calls for the same
    /// handle settle on a single row.
    async fn insert_if_absent(
        &self,
        candidate: &Citizen,
        lookup: &CitizenLookup,
    ) -> Result<Provisioned, RecordStoreError>;

    /// Replace the display name. Returns `false` when the citizen is absent.
    async fn rename(
        &self,
        id: &CitizenId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError>;

    /// Replace the editable profile. Returns `false` when the citizen is absent.
    async fn update_profile(
        &self,
        id: &CitizenId,
        profile: &CitizenProfile,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError>;

    /// Every citizen, newest first.
    async fn list_all(&self) -> Result<Vec<Citizen>, RecordStoreError>;
}
