//! Startup provisioning of the configured administrator account.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{AdminRepository, PasswordHasher};
use crate::domain::{AdminAccount, AdminCredentials, AdminId, BOOTSTRAP_ADMIN_ROLE, Error};

/// Display name given to the bootstrapped administrator.
pub const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

/// Whether [`ensure_bootstrap_admin`] wrote a new account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created,
    AlreadyPresent,
}

/// Create the configured administrator unless the username already exists.
///
/// Existing accounts are never modified, so a password changed after the
/// first start is kept.
pub async fn ensure_bootstrap_admin<A>(
    admins: &A,
    hasher: &Arc<dyn PasswordHasher>,
    clock: &Arc<dyn Clock>,
    credentials: &AdminCredentials,
) -> Result<BootstrapOutcome, Error>
where
    A: AdminRepository + ?Sized,
{
    let existing = admins
        .find_by_username(credentials.username())
        .await
        .map_err(|err| err.into_domain("admin"))?;
    if existing.is_some() {
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let password_hash = hasher.hash(credentials.password()).await.map_err(|err| {
        error!(error = %err, "could not hash bootstrap admin password");
        Error::internal("could not hash bootstrap admin password")
    })?;
    let account = AdminAccount {
        id: AdminId::random(),
        username: credentials.username().to_owned(),
        password_hash,
        name: BOOTSTRAP_ADMIN_NAME.to_owned(),
        role: BOOTSTRAP_ADMIN_ROLE.to_owned(),
        external_subject: None,
        created_at: clock.utc(),
    };
    let inserted = admins
        .insert_if_absent(&account)
        .await
        .map_err(|err| err.into_domain("admin"))?;
    if inserted {
        info!(username = %account.username, "bootstrap admin created");
        Ok(BootstrapOutcome::Created)
    } else {
        Ok(BootstrapOutcome::AlreadyPresent)
    }
}
