//! Port abstraction for one-time login challenges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MobileNumber, OtpChallenge, OtpChallengeId, OtpDigest};

use super::RecordStoreError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Store a freshly issued challenge.
    async fn insert(&self, challenge: &OtpChallenge) -> Result<(), RecordStoreError>;

    /// Atomically mark the newest unused, unexpired challenge matching
    /// `mobile` and `digest` as used.
    ///
    /// Returns the consumed challenge id, or `None` when nothing matched.
    /// Two concurrent calls never consume the same challenge.
    async fn consume(
        &self,
        mobile: &MobileNumber,
        digest: &OtpDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpChallengeId>, RecordStoreError>;
}
