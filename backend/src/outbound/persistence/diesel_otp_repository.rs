//! PostgreSQL-backed `OtpRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::sql_query;
use diesel::sql_types::{Text, Timestamptz};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OtpRepository, RecordStoreError};
use crate::domain::{MobileNumber, OtpChallenge, OtpChallengeId, OtpDigest};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ConsumedChallengeRow, NewOtpChallengeRow};
use super::pool::DbPool;
use super::schema::otp_challenges;

/// Marks the newest matching live challenge used in one statement.
/// `SKIP LOCKED` keeps two concurrent verifications from both winning.
const CONSUME_SQL: &str = "\
UPDATE otp_challenges SET used = TRUE
WHERE id = (
    SELECT id FROM otp_challenges
    WHERE mobile = $1 AND code_digest = $2 AND used = FALSE AND expires_at > $3
    ORDER BY created_at DESC
    LIMIT 1
    FOR UPDATE SKIP LOCKED
)
RETURNING id";

/// Diesel implementation of the [`OtpRepository`] port.
#[derive(Clone)]
pub struct DieselOtpRepository {
    pool: DbPool,
}

impl DieselOtpRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpRepository for DieselOtpRepository {
    async fn insert(&self, challenge: &OtpChallenge) -> Result<(), RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(otp_challenges::table)
            .values(NewOtpChallengeRow::from(challenge))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn consume(
        &self,
        mobile: &MobileNumber,
        digest: &OtpDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpChallengeId>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let consumed: Vec<ConsumedChallengeRow> = sql_query(CONSUME_SQL)
            .bind::<Text, _>(mobile.as_str())
            .bind::<Text, _>(digest.as_str())
            .bind::<Timestamptz, _>(now)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(consumed.into_iter().next().map(ConsumedChallengeRow::into_id))
    }
}
