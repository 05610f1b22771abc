//! Process configuration loaded via OrthoConfig.
//!
//! Values layer command-line flags over `SUVIDHA_*` environment variables
//! over defaults. Accessors apply defaults and parse structured values so
//! startup fails with a named field rather than a late panic.

use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{
    AdminCredentials, AuthValidationError, DEFAULT_OTP_TTL_MINUTES, LoginPolicy,
};
use crate::outbound::auth::IntrospectionClient;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 1440;
const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} has invalid value {value:?}: {reason}")]
    Invalid {
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field} is required when {context}")]
    Missing {
        field: &'static str,
        context: &'static str,
    },
}

impl SettingsError {
    fn invalid(field: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            field,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// How bearer tokens are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStrategy {
    /// Tokens signed by this service.
    #[default]
    SelfIssued,
    /// Opaque tokens checked against an introspection endpoint.
    Delegated,
}

impl FromStr for AuthStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "self_issued" => Ok(Self::SelfIssued),
            "delegated" => Ok(Self::Delegated),
            _ => Err("expected one of: self_issued, delegated".to_owned()),
        }
    }
}

/// How one-time codes are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpMode {
    /// Every code is the fixed development code.
    #[default]
    Fixed,
    /// Six random digits per challenge.
    Random,
}

impl FromStr for OtpMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "random" => Ok(Self::Random),
            _ => Err("expected one of: fixed, random".to_owned()),
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SUVIDHA")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one the process keeps records in memory.
    pub database_url: Option<String>,
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// HS256 signing secret for self-issued tokens.
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: Option<i64>,
    pub otp_ttl_minutes: Option<i64>,
    /// `fixed` or `random`.
    pub otp_mode: Option<String>,
    /// `self_issued` or `delegated`.
    pub auth_strategy: Option<String>,
    pub introspection_url: Option<String>,
    pub introspection_client_id: Option<String>,
    pub introspection_client_secret: Option<String>,
    pub admin_username: Option<String>,
    /// Bootstrap administrator password. No admin is created when unset.
    pub admin_password: Option<String>,
}

impl Settings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|err| SettingsError::invalid("bind_addr", raw, err))
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// The signing secret, wiped from memory on drop.
    pub fn jwt_secret(&self) -> Option<Zeroizing<Vec<u8>>> {
        self.jwt_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| Zeroizing::new(secret.as_bytes().to_vec()))
    }

    /// Token and one-time code lifetimes.
    pub fn login_policy(&self) -> Result<LoginPolicy, SettingsError> {
        let token_minutes = positive_minutes(
            "token_ttl_minutes",
            self.token_ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES),
        )?;
        let otp_minutes = positive_minutes(
            "otp_ttl_minutes",
            self.otp_ttl_minutes.unwrap_or(DEFAULT_OTP_TTL_MINUTES),
        )?;
        Ok(LoginPolicy {
            token_ttl: Duration::minutes(token_minutes),
            otp_ttl: Duration::minutes(otp_minutes),
        })
    }

    pub fn otp_mode(&self) -> Result<OtpMode, SettingsError> {
        parse_choice("otp_mode", self.otp_mode.as_deref())
    }

    pub fn auth_strategy(&self) -> Result<AuthStrategy, SettingsError> {
        parse_choice("auth_strategy", self.auth_strategy.as_deref())
    }

    /// Endpoint and client credentials for the delegated strategy.
    pub fn introspection(&self) -> Result<(Url, IntrospectionClient), SettingsError> {
        const CONTEXT: &str = "auth_strategy is delegated";
        let raw_url = self
            .introspection_url
            .as_deref()
            .ok_or(SettingsError::Missing {
                field: "introspection_url",
                context: CONTEXT,
            })?;
        let url = Url::parse(raw_url)
            .map_err(|err| SettingsError::invalid("introspection_url", raw_url, err))?;
        let client_id = self
            .introspection_client_id
            .clone()
            .ok_or(SettingsError::Missing {
                field: "introspection_client_id",
                context: CONTEXT,
            })?;
        let client_secret = self
            .introspection_client_secret
            .clone()
            .ok_or(SettingsError::Missing {
                field: "introspection_client_secret",
                context: CONTEXT,
            })?;
        Ok((
            url,
            IntrospectionClient {
                client_id,
                client_secret: Zeroizing::new(client_secret),
            },
        ))
    }

    /// Credentials for the bootstrap administrator, when a password is set.
    pub fn bootstrap_admin(&self) -> Result<Option<AdminCredentials>, SettingsError> {
        let Some(password) = self.admin_password.as_deref() else {
            return Ok(None);
        };
        let username = self
            .admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME);
        AdminCredentials::try_from_parts(username, password)
            .map(Some)
            .map_err(|err| match err {
                AuthValidationError::EmptyPassword => {
                    SettingsError::invalid("admin_password", "", err)
                }
                other => SettingsError::invalid("admin_username", username, other),
            })
    }
}

fn positive_minutes(field: &'static str, minutes: i64) -> Result<i64, SettingsError> {
    if minutes > 0 {
        Ok(minutes)
    } else {
        Err(SettingsError::invalid(
            field,
            &minutes.to_string(),
            "must be positive",
        ))
    }
}

fn parse_choice<T>(field: &'static str, raw: Option<&str>) -> Result<T, SettingsError>
where
    T: FromStr<Err = String> + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(value) => value
            .parse()
            .map_err(|reason: String| SettingsError::invalid(field, value, reason)),
    }
}
