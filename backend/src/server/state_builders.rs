//! Choose the record store and credential adapters from settings.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::Clock;
use tracing::{info, warn};
use zeroize::Zeroizing;

use suvidha::composition::{
    RepositorySet, ServiceAdapters, TokenVerification, build_http_state,
};
use suvidha::domain::ports::{OtpSender, PasswordHasher};
use suvidha::domain::{BootstrapOutcome, RandomReferenceCodes, ensure_bootstrap_admin};
use suvidha::inbound::http::state::HttpState;
use suvidha::outbound::auth::{
    BcryptPasswordHasher, FixedOtpSender, IntrospectionIdentityProvider, JwtTokenCodec,
    RandomOtpSender,
};
use suvidha::outbound::memory::InMemoryStore;
use suvidha::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use suvidha::{AuthStrategy, OtpMode, Settings};

const INTROSPECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Build handler state over PostgreSQL when a database URL is configured,
/// otherwise over a fresh in-process store.
pub(crate) async fn build_state(settings: &Settings, clock: Arc<dyn Clock>) -> Result<HttpState> {
    let adapters = build_adapters(settings, Arc::clone(&clock))?;
    let verification = build_verification(settings)?;

    match settings.database_url() {
        Some(database_url) => {
            if settings.run_migrations {
                run_pending_migrations(database_url)
                    .await
                    .wrap_err("failed to apply database migrations")?;
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("failed to create database pool")?;
            info!(max_connections = settings.db_max_connections(), "using PostgreSQL record store");
            finish(&pool, settings, adapters, verification).await
        }
        None => {
            warn!("no database URL configured; records are kept in memory and lost on restart");
            finish(&InMemoryStore::new(), settings, adapters, verification).await
        }
    }
}

async fn finish<R>(
    repos: &R,
    settings: &Settings,
    adapters: ServiceAdapters,
    verification: TokenVerification,
) -> Result<HttpState>
where
    R: RepositorySet,
{
    if let Some(credentials) = settings.bootstrap_admin()? {
        let outcome = ensure_bootstrap_admin(
            repos.admins().as_ref(),
            &adapters.password_hasher,
            &adapters.clock,
            &credentials,
        )
        .await
        .wrap_err("failed to provision the bootstrap administrator")?;
        if outcome == BootstrapOutcome::AlreadyPresent {
            info!(username = credentials.username(), "bootstrap admin already present");
        }
    }
    Ok(build_http_state(repos, adapters, verification))
}

fn build_adapters(settings: &Settings, clock: Arc<dyn Clock>) -> Result<ServiceAdapters> {
    let otp_sender: Arc<dyn OtpSender> = match settings.otp_mode()? {
        OtpMode::Fixed => {
            warn!("one-time codes use the fixed development code");
            Arc::new(FixedOtpSender)
        }
        OtpMode::Random => Arc::new(RandomOtpSender),
    };
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::default());
    Ok(ServiceAdapters {
        clock,
        codes: Arc::new(RandomReferenceCodes),
        token_codec: Arc::new(JwtTokenCodec::new(&signing_secret(settings)?)),
        otp_sender,
        password_hasher,
        policy: settings.login_policy()?,
    })
}

fn signing_secret(settings: &Settings) -> Result<Zeroizing<Vec<u8>>> {
    if let Some(secret) = settings.jwt_secret() {
        return Ok(secret);
    }
    if cfg!(debug_assertions) {
        warn!("no JWT secret configured; using an ephemeral secret (dev only)");
        return Ok(Zeroizing::new(rand::random::<[u8; 32]>().to_vec()));
    }
    Err(eyre!("SUVIDHA_JWT_SECRET must be set in release builds"))
}

fn build_verification(settings: &Settings) -> Result<TokenVerification> {
    match settings.auth_strategy()? {
        AuthStrategy::SelfIssued => Ok(TokenVerification::SelfIssued),
        AuthStrategy::Delegated => {
            let (endpoint, client) = settings.introspection()?;
            info!(endpoint = %endpoint, "verifying bearer tokens by introspection");
            let provider = IntrospectionIdentityProvider::new(endpoint, client, INTROSPECTION_TIMEOUT)
                .wrap_err("failed to build introspection client")?;
            Ok(TokenVerification::Delegated(Arc::new(provider)))
        }
    }
}
