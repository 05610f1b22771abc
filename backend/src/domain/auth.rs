//! Authentication primitives: roles, principals and login inputs.
//!
//! Inbound payload parsing stays outside the domain; these constructors
//! validate raw strings before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::error::Error;
use super::ids::CitizenId;
use super::labels::define_label_enum;

define_label_enum! {
    /// Role carried by every bearer token.
    pub enum Role ("role") {
        /// A citizen using the kiosk or app.
        Citizen => "citizen",
        /// A municipal operator.
        Admin => "admin",
    }
}

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    subject_id: Uuid,
    role: Role,
}

impl Principal {
    /// Build a principal from a resolved subject and role.
    #[must_use]
    pub const fn new(subject_id: Uuid, role: Role) -> Self {
        Self { subject_id, role }
    }

    /// Principal for a citizen account.
    #[must_use]
    pub const fn citizen(id: CitizenId) -> Self {
        Self::new(*id.as_uuid(), Role::Citizen)
    }

    /// Subject identifier (citizen or admin id).
    #[must_use]
    pub const fn subject_id(&self) -> Uuid {
        self.subject_id
    }

    /// Role resolved for the subject.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// True for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The citizen account behind this principal, if it is a citizen.
    #[must_use]
    pub fn citizen_id(&self) -> Option<CitizenId> {
        (self.role == Role::Citizen).then(|| CitizenId::from_uuid(self.subject_id))
    }

    /// Pass through when the principal holds `role`, otherwise forbid.
    pub fn require_role(self, role: Role) -> Result<Self, Error> {
        if self.role == role {
            return Ok(self);
        }
        Err(Error::forbidden(match role {
            Role::Admin => "Admin access required",
            Role::Citizen => "Citizen access required",
        }))
    }
}

/// Claims embedded in a self-issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Resolved caller.
    pub principal: Principal,
    /// Issue instant.
    pub issued_at: DateTime<Utc>,
    /// Expiry instant; tokens are rejected at or after this time.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login, rendered as the token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Signed bearer token.
    pub access_token: String,
    /// Role encoded in the token.
    pub role: Role,
    /// Citizen or admin id.
    pub user_id: Uuid,
    /// Display name when known.
    pub user_name: Option<String>,
}

/// Validation failures for login payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Mobile number is not exactly ten digits.
    InvalidMobile,
    /// One-time code is not exactly six digits.
    InvalidOtp,
    /// Bearer credential was blank.
    EmptyToken,
}

impl AuthValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
            Self::InvalidMobile => "mobile",
            Self::InvalidOtp => "otp",
            Self::EmptyToken => "authorization",
        }
    }
}

impl fmt::Display for AuthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidMobile => write!(f, "mobile must be a 10 digit number"),
            Self::InvalidOtp => write!(f, "otp must be a 6 digit code"),
            Self::EmptyToken => write!(f, "bearer token must not be empty"),
        }
    }
}

impl std::error::Error for AuthValidationError {}

fn all_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|byte| byte.is_ascii_digit())
}

/// Ten-digit mobile number used as the citizen login handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Validate a mobile number after trimming surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, AuthValidationError> {
        let trimmed = value.trim();
        if !all_digits(trimmed, 10) {
            return Err(AuthValidationError::InvalidMobile);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Six-digit one-time code; wiped from memory on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode(Zeroizing<String>);

impl OtpCode {
    /// Validate a one-time code.
    pub fn parse(value: &str) -> Result<Self, AuthValidationError> {
        let trimmed = value.trim();
        if !all_digits(trimmed, 6) {
            return Err(AuthValidationError::InvalidOtp);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Borrow the digits.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated administrator credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use suvidha::domain::AdminCredentials;
///
/// let creds = AdminCredentials::try_from_parts(" admin ", "admin123").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "admin123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl AdminCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, AuthValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(AuthValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AuthValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Non-empty bearer credential as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(Zeroizing<String>);

impl BearerToken {
    /// Validate a raw credential.
    pub fn parse(value: &str) -> Result<Self, AuthValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AuthValidationError::EmptyToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Borrow the credential text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(**redacted**)")
    }
}
