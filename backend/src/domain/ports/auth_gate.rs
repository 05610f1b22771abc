//! Driving port resolving bearer credentials to principals.

use async_trait::async_trait;

use crate::domain::{BearerToken, Error, Principal, Role};

/// Verifies bearer credentials.
///
/// Malformed, expired or unknown credentials yield
/// [`crate::domain::ErrorCode::Unauthorized`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGate: Send + Sync {
    /// Resolve a credential to its subject and role.
    async fn authenticate(&self, token: &BearerToken) -> Result<Principal, Error>;
}

/// Authenticate `token` and insist on `role`.
///
/// A valid token with the wrong role yields
/// [`crate::domain::ErrorCode::Forbidden`], distinct from a bad token.
pub async fn require_role(
    gate: &dyn AuthGate,
    token: &BearerToken,
    role: Role,
) -> Result<Principal, Error> {
    gate.authenticate(token).await?.require_role(role)
}
