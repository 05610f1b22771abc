//! OTP and administrator login.
//!
//! Citizens log in with a one-time code sent to their mobile; administrators
//! log in with a bcrypt-checked password. Both receive a self-issued bearer
//! token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AdminRepository, CitizenRepository, LoginService, OtpDispatch, OtpLogin, OtpRepository,
    OtpSender, PasswordHasher, TokenCodec,
};
use crate::domain::provisioning::CitizenProvisioner;
use crate::domain::{
    AdminCredentials, AuthSession, CitizenIdentity, Error, MobileNumber, OtpChallenge, OtpDigest,
    Principal, Role, TokenClaims,
};

/// Lifetimes applied by [`OtpLoginService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPolicy {
    /// How long issued bearer tokens stay valid.
    pub token_ttl: Duration,
    /// How long a one-time code can be redeemed.
    pub otp_ttl: Duration,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            token_ttl: Duration::minutes(1440),
            otp_ttl: Duration::minutes(super::otp::DEFAULT_OTP_TTL_MINUTES),
        }
    }
}

/// Collaborators that are not repositories.
#[derive(Clone)]
pub struct LoginAdapters {
    pub otp_sender: Arc<dyn OtpSender>,
    pub token_codec: Arc<dyn TokenCodec>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

/// Login service implementing the [`LoginService`] driving port.
pub struct OtpLoginService<O, C, A> {
    otps: Arc<O>,
    citizens: Arc<C>,
    admins: Arc<A>,
    provisioner: CitizenProvisioner<C>,
    adapters: LoginAdapters,
    policy: LoginPolicy,
}

impl<O, C, A> OtpLoginService<O, C, A>
where
    C: CitizenRepository,
{
    /// Assemble the service.
    pub fn new(
        otps: Arc<O>,
        citizens: Arc<C>,
        admins: Arc<A>,
        adapters: LoginAdapters,
        policy: LoginPolicy,
    ) -> Self {
        let provisioner = CitizenProvisioner::new(Arc::clone(&citizens), Arc::clone(&adapters.clock));
        Self {
            otps,
            citizens,
            admins,
            provisioner,
            adapters,
            policy,
        }
    }
}

impl<O, C, A> OtpLoginService<O, C, A> {
    fn issue_session(
        &self,
        principal: Principal,
        user_name: Option<String>,
    ) -> Result<AuthSession, Error> {
        let issued_at = self.adapters.clock.utc();
        let claims = TokenClaims {
            principal,
            issued_at,
            expires_at: issued_at + self.policy.token_ttl,
        };
        let access_token = self
            .adapters
            .token_codec
            .issue(&claims)
            .map_err(|err| Error::internal(format!("failed to issue token: {err}")))?;
        Ok(AuthSession {
            access_token,
            role: principal.role(),
            user_id: principal.subject_id(),
            user_name,
        })
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("Invalid credentials")
    }
}

#[async_trait]
impl<O, C, A> LoginService for OtpLoginService<O, C, A>
where
    O: OtpRepository,
    C: CitizenRepository,
    A: AdminRepository,
{
    async fn send_otp(&self, mobile: &MobileNumber) -> Result<OtpDispatch, Error> {
        let delivered = self.adapters.otp_sender.send(mobile).await.map_err(|err| {
            warn!(error = %err, "otp delivery failed");
            Error::service_unavailable("OTP delivery unavailable")
        })?;
        let challenge = OtpChallenge::issue(
            mobile,
            &delivered.code,
            self.adapters.clock.utc(),
            self.policy.otp_ttl,
        );
        self.otps
            .insert(&challenge)
            .await
            .map_err(|err| err.into_domain("otp"))?;
        info!(challenge_id = %challenge.id, expires_at = %challenge.expires_at, "otp issued");
        Ok(OtpDispatch {
            hint: delivered.hint,
        })
    }

    async fn verify_otp(&self, login: OtpLogin) -> Result<AuthSession, Error> {
        let OtpLogin {
            mobile,
            otp,
            name,
            aadhaar_number,
            language,
        } = login;
        let consumed = self
            .otps
            .consume(&mobile, &OtpDigest::of(&otp), self.adapters.clock.utc())
            .await
            .map_err(|err| err.into_domain("otp"))?;
        if consumed.is_none() {
            return Err(Error::invalid_request("Invalid or expired OTP"));
        }

        let supplied_name = name.clone().filter(|value| !value.trim().is_empty());
        let identity =
            CitizenIdentity::from_mobile(mobile).with_profile(name, aadhaar_number, language);
        let provisioned = self.provisioner.ensure_citizen_record(identity).await?;
        let mut citizen = provisioned.citizen;

        if let Some(new_name) = supplied_name.filter(|_| !provisioned.created) {
            self.citizens
                .rename(&citizen.id, &new_name, self.adapters.clock.utc())
                .await
                .map_err(|err| err.into_domain("citizen"))?;
            citizen.name = Some(new_name);
        }

        self.issue_session(Principal::citizen(citizen.id), citizen.name)
    }

    async fn admin_login(&self, credentials: &AdminCredentials) -> Result<AuthSession, Error> {
        let Some(admin) = self
            .admins
            .find_by_username(credentials.username())
            .await
            .map_err(|err| err.into_domain("admin"))?
        else {
            return Err(Self::invalid_credentials());
        };

        let matches = self
            .adapters
            .password_hasher
            .verify(credentials.password(), &admin.password_hash)
            .await
            .map_err(|err| {
                warn!(admin_id = %admin.id, error = %err, "password verification failed");
                Self::invalid_credentials()
            })?;
        if !matches {
            return Err(Self::invalid_credentials());
        }

        self.issue_session(
            Principal::new(*admin.id.as_uuid(), Role::Admin),
            Some(admin.name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        DeliveredOtp, MockAdminRepository, MockCitizenRepository, MockOtpRepository,
        MockOtpSender, MockPasswordHasher, MockTokenCodec,
    };
    use crate::domain::test_clock::fixture_clock;
    use crate::domain::{
        AdminAccount, AdminId, CitizenId, ErrorCode, OtpChallengeId, OtpCode, Provisioned,
    };
    use rstest::rstest;

    struct Doubles {
        otps: MockOtpRepository,
        citizens: MockCitizenRepository,
        admins: MockAdminRepository,
        sender: MockOtpSender,
        codec: MockTokenCodec,
        hasher: MockPasswordHasher,
    }

    impl Doubles {
        fn new() -> Self {
            let mut codec = MockTokenCodec::new();
            codec
                .expect_issue()
                .returning(|claims| Ok(format!("token-for-{}", claims.principal.subject_id())));
            Self {
                otps: MockOtpRepository::new(),
                citizens: MockCitizenRepository::new(),
                admins: MockAdminRepository::new(),
                sender: MockOtpSender::new(),
                codec,
                hasher: MockPasswordHasher::new(),
            }
        }

        fn build(
            self,
        ) -> OtpLoginService<MockOtpRepository, MockCitizenRepository, MockAdminRepository> {
            OtpLoginService::new(
                Arc::new(self.otps),
                Arc::new(self.citizens),
                Arc::new(self.admins),
                LoginAdapters {
                    otp_sender: Arc::new(self.sender),
                    token_codec: Arc::new(self.codec),
                    password_hasher: Arc::new(self.hasher),
                    clock: fixture_clock(),
                },
                LoginPolicy::default(),
            )
        }
    }

    fn mobile() -> MobileNumber {
        MobileNumber::parse("9876543210").expect("valid mobile")
    }

    fn login(name: Option<&str>) -> OtpLogin {
        OtpLogin {
            mobile: mobile(),
            otp: OtpCode::parse("123456").expect("valid code"),
            name: name.map(str::to_owned),
            aadhaar_number: None,
            language: None,
        }
    }

    fn admin_account() -> AdminAccount {
        AdminAccount {
            id: AdminId::random(),
            username: "admin".into(),
            password_hash: "$2b$12$hash".into(),
            name: "Administrator".into(),
            role: "super_admin".into(),
            external_subject: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn send_otp_stores_digest_and_returns_hint() {
        let mut doubles = Doubles::new();
        doubles.sender.expect_send().times(1).returning(|_| {
            Ok(DeliveredOtp {
                code: OtpCode::parse("123456").expect("valid code"),
                hint: Some("For testing, use OTP: 123456".into()),
            })
        });
        doubles
            .otps
            .expect_insert()
            .withf(|challenge| {
                challenge.code_digest == OtpDigest::of(&OtpCode::parse("123456").expect("code"))
                    && !challenge.used
                    && challenge.expires_at - challenge.created_at == Duration::minutes(10)
            })
            .times(1)
            .returning(|_| Ok(()));

        let dispatch = doubles.build().send_otp(&mobile()).await.expect("sent");
        assert_eq!(dispatch.hint.as_deref(), Some("For testing, use OTP: 123456"));
    }

    #[tokio::test]
    async fn verify_otp_rejects_unmatched_code() {
        let mut doubles = Doubles::new();
        doubles.otps.expect_consume().returning(|_, _, _| Ok(None));
        doubles.citizens.expect_find_by_lookup().never();

        let err = doubles
            .build()
            .verify_otp(login(None))
            .await
            .expect_err("no challenge");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.detail(), "Invalid or expired OTP");
    }

    #[tokio::test]
    async fn verify_otp_provisions_new_citizen() {
        let mut doubles = Doubles::new();
        doubles
            .otps
            .expect_consume()
            .returning(|_, _, _| Ok(Some(OtpChallengeId::random())));
        doubles
            .citizens
            .expect_find_by_lookup()
            .returning(|_| Ok(None));
        doubles
            .citizens
            .expect_insert_if_absent()
            .times(1)
            .returning(|candidate, _| {
                Ok(Provisioned {
                    citizen: candidate.clone(),
                    created: true,
                })
            });
        doubles.citizens.expect_rename().never();

        let session = doubles
            .build()
            .verify_otp(login(Some("Asha")))
            .await
            .expect("login succeeds");
        assert_eq!(session.role, Role::Citizen);
        assert_eq!(session.user_name.as_deref(), Some("Asha"));
        assert_eq!(session.access_token, format!("token-for-{}", session.user_id));
    }

    #[tokio::test]
    async fn verify_otp_renames_existing_citizen_when_name_supplied() {
        let existing = CitizenIdentity::from_mobile(mobile())
            .with_profile(Some("Old".into()), None, None)
            .into_citizen(CitizenId::random(), chrono::Utc::now());
        let existing_id = existing.id;
        let mut doubles = Doubles::new();
        doubles
            .otps
            .expect_consume()
            .returning(|_, _, _| Ok(Some(OtpChallengeId::random())));
        doubles
            .citizens
            .expect_find_by_lookup()
            .return_once(move |_| Ok(Some(existing)));
        doubles
            .citizens
            .expect_rename()
            .withf(move |id, name, _| *id == existing_id && name == "New")
            .times(1)
            .returning(|_, _, _| Ok(true));

        let session = doubles
            .build()
            .verify_otp(login(Some("New")))
            .await
            .expect("login succeeds");
        assert_eq!(session.user_id, *existing_id.as_uuid());
        assert_eq!(session.user_name.as_deref(), Some("New"));
    }

    #[rstest]
    #[case(false, true)]
    #[case(true, false)]
    #[tokio::test]
    async fn admin_login_failures_share_one_message(
        #[case] account_exists: bool,
        #[case] password_matches: bool,
    ) {
        let mut doubles = Doubles::new();
        doubles
            .admins
            .expect_find_by_username()
            .returning(move |_| Ok(account_exists.then(admin_account)));
        doubles
            .hasher
            .expect_verify()
            .returning(move |_, _| Ok(password_matches));

        let credentials = AdminCredentials::try_from_parts("admin", "wrong").expect("shape");
        let err = doubles
            .build()
            .admin_login(&credentials)
            .await
            .expect_err("login rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.detail(), "Invalid credentials");
    }

    #[tokio::test]
    async fn admin_login_returns_admin_token() {
        let account = admin_account();
        let admin_id = account.id;
        let mut doubles = Doubles::new();
        doubles
            .admins
            .expect_find_by_username()
            .return_once(move |_| Ok(Some(account)));
        doubles.hasher.expect_verify().returning(|_, _| Ok(true));

        let credentials = AdminCredentials::try_from_parts("admin", "admin123").expect("shape");
        let session = doubles
            .build()
            .admin_login(&credentials)
            .await
            .expect("login succeeds");
        assert_eq!(session.role, Role::Admin);
        assert_eq!(session.user_id, *admin_id.as_uuid());
        assert_eq!(session.user_name.as_deref(), Some("Administrator"));
    }
}
