//! PostgreSQL-backed `CitizenRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{CitizenRepository, RecordStoreError};
use crate::domain::{Citizen, CitizenId, CitizenLookup, CitizenProfile, CitizenSummary, Provisioned};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CitizenProfileChangeset, CitizenRow};
use super::pool::DbPool;
use super::schema::citizens;

/// Diesel implementation of the [`CitizenRepository`] port.
#[derive(Clone)]
pub struct DieselCitizenRepository {
    pool: DbPool,
}

impl DieselCitizenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn find_by_lookup(
    conn: &mut AsyncPgConnection,
    lookup: &CitizenLookup,
) -> Result<Option<CitizenRow>, diesel::result::Error> {
    let query = citizens::table.select(CitizenRow::as_select()).into_boxed();
    let query = match lookup {
        CitizenLookup::Mobile(mobile) => query.filter(citizens::mobile.eq(mobile.as_str())),
        CitizenLookup::ExternalSubject(subject) => {
            query.filter(citizens::external_subject.eq(subject.as_str()))
        }
    };
    query.first(conn).await.optional()
}

/// Name and mobile for each citizen in `ids`, used by admin listings.
pub(crate) async fn load_citizen_summaries(
    conn: &mut AsyncPgConnection,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<HashMap<Uuid, CitizenSummary>, RecordStoreError> {
    let mut wanted: Vec<Uuid> = ids.into_iter().collect();
    wanted.sort_unstable();
    wanted.dedup();
    if wanted.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(Uuid, Option<String>, Option<String>)> = citizens::table
        .filter(citizens::id.eq_any(&wanted))
        .select((citizens::id, citizens::name, citizens::mobile))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(rows
        .into_iter()
        .map(|(id, name, mobile)| (id, CitizenSummary { name, mobile }))
        .collect())
}

#[async_trait]
impl CitizenRepository for DieselCitizenRepository {
    async fn find_by_id(&self, id: &CitizenId) -> Result<Option<Citizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = citizens::table
            .find(id.as_uuid())
            .select(CitizenRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Citizen::from))
    }

    async fn find_by_lookup(
        &self,
        lookup: &CitizenLookup,
    ) -> Result<Option<Citizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = find_by_lookup(&mut conn, lookup)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.map(Citizen::from))
    }

    async fn insert_if_absent(
        &self,
        candidate: &Citizen,
        lookup: &CitizenLookup,
    ) -> Result<Provisioned, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(citizens::table)
            .values(CitizenRow::from(candidate))
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if inserted == 1 {
            return Ok(Provisioned {
                citizen: candidate.clone(),
                created: true,
            });
        }

        // Lost a race with a concurrent first login, or the candidate clashes
        // on a different unique column.
        if let Some(existing) = find_by_lookup(&mut conn, lookup)
            .await
            .map_err(map_diesel_error)?
        {
            return Ok(Provisioned {
                citizen: existing.into(),
                created: false,
            });
        }
        if !candidate.mobile.is_empty() {
            let holders: i64 = citizens::table
                .filter(citizens::mobile.eq(candidate.mobile.as_str()))
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            if holders > 0 {
                return Err(RecordStoreError::mobile_taken(candidate.mobile.clone()));
            }
        }
        Err(RecordStoreError::query(
            "citizen conflicts with an existing account",
        ))
    }

    async fn rename(
        &self,
        id: &CitizenId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(citizens::table.find(id.as_uuid()))
            .set((citizens::name.eq(name), citizens::updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn update_profile(
        &self,
        id: &CitizenId,
        profile: &CitizenProfile,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = CitizenProfileChangeset {
            name: profile.name.as_deref(),
            aadhaar_number: profile.aadhaar_number.as_deref(),
            email: profile.email.as_deref(),
            address: profile.address.as_deref(),
            city: profile.city.as_deref(),
            state: profile.state.as_deref(),
            pincode: profile.pincode.as_deref(),
            language: profile.language_or_default(),
            updated_at: now,
        };
        let updated = diesel::update(citizens::table.find(id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn list_all(&self) -> Result<Vec<Citizen>, RecordStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = citizens::table
            .order(citizens::created_at.desc())
            .select(CitizenRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Citizen::from).collect())
    }
}
