//! Bearer-token verification strategies.
//!
//! One strategy is active per deployment: self-issued tokens signed by
//! [`TokenCodec`], or tokens from an external identity provider resolved
//! against local admin and citizen records.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    AdminRepository, AuthGate, CitizenRepository, IdentityProvider, IdentityProviderError,
    TokenCodec,
};
use crate::domain::provisioning::CitizenProvisioner;
use crate::domain::{
    BearerToken, CitizenIdentity, CitizenLookup, Error, MobileNumber, Principal, Role,
};

const INVALID_TOKEN: &str = "Invalid token";

/// Verifies self-issued tokens: signature and expiry only.
pub struct TokenAuthGate {
    codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
}

impl TokenAuthGate {
    /// Create a gate verifying tokens with `codec`.
    pub fn new(codec: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self { codec, clock }
    }
}

#[async_trait]
impl AuthGate for TokenAuthGate {
    async fn authenticate(&self, token: &BearerToken) -> Result<Principal, Error> {
        let claims = self.codec.decode(token.expose()).map_err(|err| {
            debug!(error = %err, "bearer token rejected");
            Error::unauthorized(INVALID_TOKEN)
        })?;
        if claims.expires_at <= self.clock.utc() {
            debug!(subject = %claims.principal.subject_id(), "bearer token expired");
            return Err(Error::unauthorized(INVALID_TOKEN));
        }
        Ok(claims.principal)
    }
}

/// Verifies tokens with an external identity provider.
///
/// The subject is matched against administrators first, then citizens. A
/// subject matching neither is provisioned as a new citizen.
pub struct DelegatedAuthGate<A, C> {
    provider: Arc<dyn IdentityProvider>,
    admins: Arc<A>,
    provisioner: CitizenProvisioner<C>,
}

impl<A, C> DelegatedAuthGate<A, C>
where
    C: CitizenRepository,
{
    /// Create a gate backed by `provider`.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        admins: Arc<A>,
        citizens: Arc<C>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            admins,
            provisioner: CitizenProvisioner::new(citizens, clock),
        }
    }
}

#[async_trait]
impl<A, C> AuthGate for DelegatedAuthGate<A, C>
where
    A: AdminRepository,
    C: CitizenRepository,
{
    async fn authenticate(&self, token: &BearerToken) -> Result<Principal, Error> {
        let identity = self
            .provider
            .verify(token.expose())
            .await
            .map_err(|err| match err {
                IdentityProviderError::Rejected { .. } => Error::unauthorized(INVALID_TOKEN),
                other => {
                    warn!(error = %other, "identity provider unavailable");
                    Error::service_unavailable("identity provider unavailable")
                }
            })?;

        if let Some(admin) = self
            .admins
            .find_by_external_subject(&identity.subject)
            .await
            .map_err(|err| err.into_domain("admin"))?
        {
            return Ok(Principal::new(*admin.id.as_uuid(), Role::Admin));
        }

        let mobile = identity
            .phone_number
            .as_deref()
            .and_then(|raw| MobileNumber::parse(raw.trim_start_matches("+91")).ok());
        let citizen_identity = CitizenIdentity {
            lookup: CitizenLookup::ExternalSubject(identity.subject),
            mobile,
            name: identity.name,
            aadhaar_number: None,
            language: None,
        };
        let provisioned = self
            .provisioner
            .ensure_citizen_record(citizen_identity)
            .await?;
        Ok(Principal::citizen(provisioned.citizen.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ExternalIdentity, MockAdminRepository, MockCitizenRepository, MockIdentityProvider,
        MockTokenCodec, TokenError,
    };
    use crate::domain::test_clock::{fixture_clock, fixture_timestamp};
    use crate::domain::{
        AdminAccount, AdminId, CitizenId, ErrorCode, Provisioned, TokenClaims,
    };
    use chrono::Duration;
    use rstest::rstest;

    fn token() -> BearerToken {
        BearerToken::parse("opaque").expect("non-empty")
    }

    fn claims(expires_in: Duration) -> TokenClaims {
        TokenClaims {
            principal: Principal::citizen(CitizenId::random()),
            issued_at: fixture_timestamp() - Duration::minutes(1),
            expires_at: fixture_timestamp() + expires_in,
        }
    }

    #[rstest]
    #[case(Duration::minutes(5), true)]
    #[case(Duration::zero(), false)]
    #[case(Duration::minutes(-5), false)]
    #[tokio::test]
    async fn self_issued_tokens_honour_expiry(#[case] expires_in: Duration, #[case] valid: bool) {
        let issued = claims(expires_in);
        let expected = issued.principal;
        let mut codec = MockTokenCodec::new();
        codec.expect_decode().return_once(move |_| Ok(issued));
        let gate = TokenAuthGate::new(Arc::new(codec), fixture_clock());

        let result = gate.authenticate(&token()).await;
        match (valid, result) {
            (true, Ok(principal)) => assert_eq!(principal, expected),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (true, Err(err)) => panic!("expected success, got {err:?}"),
            (false, Ok(principal)) => panic!("expected rejection, got {principal:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_tokens_are_unauthorized() {
        let mut codec = MockTokenCodec::new();
        codec
            .expect_decode()
            .returning(|_| Err(TokenError::invalid("bad signature")));
        let gate = TokenAuthGate::new(Arc::new(codec), fixture_clock());
        let err = gate.authenticate(&token()).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.detail(), "Invalid token");
    }

    fn identity() -> ExternalIdentity {
        ExternalIdentity {
            subject: "idp|42".into(),
            phone_number: Some("+919876543210".into()),
            name: Some("Ravi".into()),
        }
    }

    #[tokio::test]
    async fn delegated_admin_subject_resolves_to_admin() {
        let admin_id = AdminId::random();
        let mut provider = MockIdentityProvider::new();
        provider.expect_verify().returning(|_| Ok(identity()));
        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_external_subject()
            .returning(move |_| {
                Ok(Some(AdminAccount {
                    id: admin_id,
                    username: "ops".into(),
                    password_hash: String::new(),
                    name: "Ops".into(),
                    role: "admin".into(),
                    external_subject: Some("idp|42".into()),
                    created_at: fixture_timestamp(),
                }))
            });
        let mut citizens = MockCitizenRepository::new();
        citizens.expect_find_by_lookup().never();

        let gate = DelegatedAuthGate::new(
            Arc::new(provider),
            Arc::new(admins),
            Arc::new(citizens),
            fixture_clock(),
        );
        let principal = gate.authenticate(&token()).await.expect("admin resolves");
        assert_eq!(principal.role(), Role::Admin);
        assert_eq!(principal.subject_id(), *admin_id.as_uuid());
    }

    #[tokio::test]
    async fn delegated_unknown_subject_is_provisioned_as_citizen() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_verify().returning(|_| Ok(identity()));
        let mut admins = MockAdminRepository::new();
        admins
            .expect_find_by_external_subject()
            .returning(|_| Ok(None));
        let mut citizens = MockCitizenRepository::new();
        citizens.expect_find_by_lookup().returning(|_| Ok(None));
        citizens
            .expect_insert_if_absent()
            .withf(|candidate, lookup| {
                candidate.mobile == "9876543210"
                    && candidate.external_subject.as_deref() == Some("idp|42")
                    && *lookup == CitizenLookup::ExternalSubject("idp|42".into())
            })
            .times(1)
            .returning(|candidate, _| {
                Ok(Provisioned {
                    citizen: candidate.clone(),
                    created: true,
                })
            });

        let gate = DelegatedAuthGate::new(
            Arc::new(provider),
            Arc::new(admins),
            Arc::new(citizens),
            fixture_clock(),
        );
        let principal = gate.authenticate(&token()).await.expect("citizen resolves");
        assert_eq!(principal.role(), Role::Citizen);
    }

    #[tokio::test]
    async fn delegated_subjects_sharing_a_phone_get_separate_citizens() {
        use crate::domain::ports::CitizenRepository as _;
        use crate::outbound::memory::InMemoryStore;

        let mut provider = MockIdentityProvider::new();
        provider.expect_verify().returning(|raw| {
            Ok(ExternalIdentity {
                subject: format!("idp|{raw}"),
                phone_number: Some("+919876543210".into()),
                name: None,
            })
        });
        let store = Arc::new(InMemoryStore::new());
        let gate = DelegatedAuthGate::new(
            Arc::new(provider),
            Arc::clone(&store),
            Arc::clone(&store),
            fixture_clock(),
        );

        let first = gate
            .authenticate(&BearerToken::parse("first").expect("non-empty"))
            .await
            .expect("first subject resolves");
        let second = gate
            .authenticate(&BearerToken::parse("second").expect("non-empty"))
            .await
            .expect("second subject resolves");
        assert_eq!(first.role(), Role::Citizen);
        assert_eq!(second.role(), Role::Citizen);
        assert_ne!(first.subject_id(), second.subject_id());

        let second_citizen = store
            .find_by_lookup(&CitizenLookup::ExternalSubject("idp|second".into()))
            .await
            .expect("lookup succeeds")
            .expect("second citizen stored");
        assert!(second_citizen.mobile.is_empty());

        let again = gate
            .authenticate(&BearerToken::parse("second").expect("non-empty"))
            .await
            .expect("repeat login resolves");
        assert_eq!(again.subject_id(), second.subject_id());
    }

    #[rstest]
    #[case(IdentityProviderError::rejected("inactive"), ErrorCode::Unauthorized)]
    #[case(IdentityProviderError::connection("timeout"), ErrorCode::ServiceUnavailable)]
    #[tokio::test]
    async fn delegated_provider_failures_map_to_codes(
        #[case] failure: IdentityProviderError,
        #[case] expected: ErrorCode,
    ) {
        let mut provider = MockIdentityProvider::new();
        provider.expect_verify().return_once(move |_| Err(failure));
        let gate = DelegatedAuthGate::new(
            Arc::new(provider),
            Arc::new(MockAdminRepository::new()),
            Arc::new(MockCitizenRepository::new()),
            fixture_clock(),
        );
        let err = gate.authenticate(&token()).await.expect_err("rejected");
        assert_eq!(err.code(), expected);
    }
}
