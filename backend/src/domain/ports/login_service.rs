//! Driving port for login use-cases.
//!
//! Inbound adapters call this port to exchange one-time codes or admin
//! credentials for bearer tokens without importing persistence or token
//! infrastructure.

use async_trait::async_trait;

use crate::domain::{AdminCredentials, AuthSession, Error, MobileNumber, OtpCode};

/// Outcome of issuing a one-time code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpDispatch {
    /// Development hint revealing the code, when the delivery adapter
    /// provides one.
    pub hint: Option<String>,
}

/// Citizen OTP login with optional profile fields for first-time sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpLogin {
    pub mobile: MobileNumber,
    pub otp: OtpCode,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub language: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Issue and deliver a one-time code for `mobile`.
    async fn send_otp(&self, mobile: &MobileNumber) -> Result<OtpDispatch, Error>;

    /// Consume a one-time code and return a citizen token, provisioning the
    /// account on first login.
    async fn verify_otp(&self, login: OtpLogin) -> Result<AuthSession, Error>;

    /// Check administrator credentials and return an admin token.
    async fn admin_login(&self, credentials: &AdminCredentials) -> Result<AuthSession, Error>;
}
