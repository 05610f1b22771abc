//! Citizen, administrator and one-time-code storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AdminRepository, CitizenRepository, OtpRepository, RecordStoreError,
};
use crate::domain::{
    AdminAccount, AdminId, Citizen, CitizenId, CitizenLookup, CitizenProfile, MobileNumber,
    OtpChallenge, OtpChallengeId, OtpDigest, Provisioned,
};

use super::{InMemoryStore, StoreState};

fn matches_lookup(citizen: &Citizen, lookup: &CitizenLookup) -> bool {
    match lookup {
        CitizenLookup::Mobile(mobile) => citizen.mobile == mobile.as_str(),
        CitizenLookup::ExternalSubject(subject) => {
            citizen.external_subject.as_deref() == Some(subject.as_str())
        }
    }
}

impl StoreState {
    fn citizen_mut(&mut self, id: &CitizenId) -> Option<&mut Citizen> {
        self.citizens.iter_mut().find(|citizen| citizen.id == *id)
    }
}

#[async_trait]
impl CitizenRepository for InMemoryStore {
    async fn find_by_id(&self, id: &CitizenId) -> Result<Option<Citizen>, RecordStoreError> {
        Ok(self.state.lock().await.citizen(id).cloned())
    }

    async fn find_by_lookup(
        &self,
        lookup: &CitizenLookup,
    ) -> Result<Option<Citizen>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .citizens
            .iter()
            .find(|citizen| matches_lookup(citizen, lookup))
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        candidate: &Citizen,
        lookup: &CitizenLookup,
    ) -> Result<Provisioned, RecordStoreError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .citizens
            .iter()
            .find(|citizen| matches_lookup(citizen, lookup))
        {
            return Ok(Provisioned {
                citizen: existing.clone(),
                created: false,
            });
        }
        let mobile_taken = !candidate.mobile.is_empty()
            && state
                .citizens
                .iter()
                .any(|citizen| citizen.mobile == candidate.mobile);
        if mobile_taken {
            return Err(RecordStoreError::mobile_taken(candidate.mobile.clone()));
        }
        state.citizens.push(candidate.clone());
        Ok(Provisioned {
            citizen: candidate.clone(),
            created: true,
        })
    }

    async fn rename(
        &self,
        id: &CitizenId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        let Some(citizen) = state.citizen_mut(id) else {
            return Ok(false);
        };
        citizen.name = Some(name.to_owned());
        citizen.updated_at = now;
        Ok(true)
    }

    async fn update_profile(
        &self,
        id: &CitizenId,
        profile: &CitizenProfile,
        now: DateTime<Utc>,
    ) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        let Some(citizen) = state.citizen_mut(id) else {
            return Ok(false);
        };
        profile.apply_to(citizen, now);
        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<Citizen>, RecordStoreError> {
        let mut citizens = self.state.lock().await.citizens.clone();
        citizens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(citizens)
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|admin| admin.username == username)
            .cloned())
    }

    async fn find_by_external_subject(
        &self,
        subject: &str,
    ) -> Result<Option<AdminAccount>, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|admin| admin.external_subject.as_deref() == Some(subject))
            .cloned())
    }

    async fn exists(&self, id: &AdminId) -> Result<bool, RecordStoreError> {
        let state = self.state.lock().await;
        Ok(state.admins.iter().any(|admin| admin.id == *id))
    }

    async fn insert_if_absent(&self, account: &AdminAccount) -> Result<bool, RecordStoreError> {
        let mut state = self.state.lock().await;
        if state
            .admins
            .iter()
            .any(|admin| admin.username == account.username)
        {
            return Ok(false);
        }
        state.admins.push(account.clone());
        Ok(true)
    }
}

#[async_trait]
impl OtpRepository for InMemoryStore {
    async fn insert(&self, challenge: &OtpChallenge) -> Result<(), RecordStoreError> {
        self.state.lock().await.otp_challenges.push(challenge.clone());
        Ok(())
    }

    async fn consume(
        &self,
        mobile: &MobileNumber,
        digest: &OtpDigest,
        now: DateTime<Utc>,
    ) -> Result<Option<OtpChallengeId>, RecordStoreError> {
        let mut state = self.state.lock().await;
        let newest = state
            .otp_challenges
            .iter_mut()
            .filter(|challenge| challenge.accepts(mobile, digest, now))
            .max_by_key(|challenge| challenge.created_at);
        Ok(newest.map(|challenge| {
            challenge.used = true;
            challenge.id
        }))
    }
}
