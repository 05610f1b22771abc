//! Port for verifying tokens issued by an external identity provider.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Connection { message: String } => "identity provider unreachable: {message}",
        /// The provider reported the token as inactive or invalid.
        Rejected { message: String } => "identity token rejected: {message}",
        /// The provider answered with an unexpected payload.
        InvalidResponse { message: String } => "identity provider response invalid: {message}",
    }
}

/// Identity asserted by the provider for an active token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    /// Stable subject identifier.
    pub subject: String,
    /// Verified phone number, when the provider shares one.
    pub phone_number: Option<String>,
    /// Display name, when the provider shares one.
    pub name: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token` and return the identity it asserts.
    ///
    /// Verification has no side effects on local storage.
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityProviderError>;
}
