//! Administrator accounts.

use chrono::{DateTime, Utc};

use super::ids::AdminId;

/// Role label given to the configuration-bootstrapped administrator.
pub const BOOTSTRAP_ADMIN_ROLE: &str = "super_admin";

/// Role label for administrators created any other way.
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

/// Stored administrator account.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub id: AdminId,
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    pub name: String,
    /// Free-form role label; every label grants the admin role.
    pub role: String,
    /// Subject of a delegated identity provider mapped to this account.
    pub external_subject: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("external_subject", &self.external_subject)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
