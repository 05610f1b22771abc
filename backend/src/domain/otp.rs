//! One-time login challenges.
//!
//! Only a SHA-256 digest of each code is stored. A challenge is consumed at
//! most once and only before it expires.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use super::auth::{MobileNumber, OtpCode};
use super::ids::OtpChallengeId;

/// Default challenge lifetime.
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;

/// Hex-encoded SHA-256 digest of a one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OtpDigest(String);

impl OtpDigest {
    /// Digest `code` for storage or lookup.
    #[must_use]
    pub fn of(code: &OtpCode) -> Self {
        Self(hex::encode(Sha256::digest(code.expose().as_bytes())))
    }

    /// Wrap a digest read back from storage.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    pub id: OtpChallengeId,
    pub mobile: String,
    pub code_digest: OtpDigest,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl OtpChallenge {
    /// New unused challenge for `code`, expiring `ttl` after `now`.
    #[must_use]
    pub fn issue(mobile: &MobileNumber, code: &OtpCode, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: OtpChallengeId::random(),
            mobile: mobile.as_str().to_owned(),
            code_digest: OtpDigest::of(code),
            expires_at: now + ttl,
            used: false,
            created_at: now,
        }
    }

    /// Whether this challenge accepts `digest` for `mobile` at `now`.
    #[must_use]
    pub fn accepts(&self, mobile: &MobileNumber, digest: &OtpDigest, now: DateTime<Utc>) -> bool {
        !self.used
            && self.mobile == mobile.as_str()
            && &self.code_digest == digest
            && self.expires_at > now
    }
}
