//! Port abstraction for administrator account storage.

use async_trait::async_trait;

use crate::domain::{AdminAccount, AdminId};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Fetch an administrator by login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError>;

    /// Fetch the administrator mapped to a delegated identity subject.
    async fn find_by_external_subject(
        &self,
        subject: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError>;

    /// Whether an administrator with this id exists.
    async fn exists(&self, id: &AdminId) -> Result<bool, RecordStoreError>;

    /// Insert unless the username is taken. Returns `true` when inserted.
    async fn insert_if_absent(&self, account: &AdminAccount) -> Result<bool, RecordStoreError>;
}
