//! Port for signing and verifying self-issued bearer tokens.

use crate::domain::TokenClaims;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token codecs.
    pub enum TokenError {
        /// Signature, structure or claims are invalid.
        Invalid { message: String } => "token rejected: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Signs claims into opaque tokens and verifies them back.
///
/// Verification checks the signature and structure; callers compare
/// `expires_at` against their own clock.
#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into a bearer token.
    fn issue(&self, claims: &TokenClaims) -> Result<String, TokenError>;

    /// Decode and verify a bearer token.
    fn decode(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
