//! Citizen accounts.
//!
//! Citizens are created implicitly the first time they authenticate and are
//! never deleted. The mobile number is the unique login handle.

use chrono::{DateTime, Utc};

use super::auth::MobileNumber;
use super::ids::CitizenId;

/// Language used when the citizen does not choose one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Stored citizen account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citizen {
    pub id: CitizenId,
    pub mobile: String,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub language: String,
    /// Subject of a delegated identity provider, when provisioned that way.
    pub external_subject: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement of the editable profile fields.
///
/// A missing language falls back to [`DEFAULT_LANGUAGE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitizenProfile {
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub language: Option<String>,
}

impl CitizenProfile {
    /// Language to store, defaulting blank input.
    #[must_use]
    pub fn language_or_default(&self) -> String {
        normalise_language(self.language.as_deref())
    }

    /// Copy the profile onto `citizen`, stamping `updated_at`.
    pub fn apply_to(&self, citizen: &mut Citizen, now: DateTime<Utc>) {
        citizen.name.clone_from(&self.name);
        citizen.aadhaar_number.clone_from(&self.aadhaar_number);
        citizen.email.clone_from(&self.email);
        citizen.address.clone_from(&self.address);
        citizen.city.clone_from(&self.city);
        citizen.state.clone_from(&self.state);
        citizen.pincode.clone_from(&self.pincode);
        citizen.language = self.language_or_default();
        citizen.updated_at = now;
    }
}

/// Identity asserted at login, used to find or provision the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitizenLookup {
    /// OTP login by mobile number.
    Mobile(MobileNumber),
    /// Delegated login by identity-provider subject.
    ExternalSubject(String),
}

/// Everything known about a citizen at the moment they authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitizenIdentity {
    pub lookup: CitizenLookup,
    /// Mobile number when known; delegated identities may omit it.
    pub mobile: Option<MobileNumber>,
    pub name: Option<String>,
    pub aadhaar_number: Option<String>,
    pub language: Option<String>,
}

impl CitizenIdentity {
    /// Identity for an OTP login.
    #[must_use]
    pub fn from_mobile(mobile: MobileNumber) -> Self {
        Self {
            lookup: CitizenLookup::Mobile(mobile.clone()),
            mobile: Some(mobile),
            name: None,
            aadhaar_number: None,
            language: None,
        }
    }

    /// Attach the optional profile fields supplied with the login.
    #[must_use]
    pub fn with_profile(
        mut self,
        name: Option<String>,
        aadhaar_number: Option<String>,
        language: Option<String>,
    ) -> Self {
        self.name = non_blank(name);
        self.aadhaar_number = non_blank(aadhaar_number);
        self.language = non_blank(language);
        self
    }

    /// Build a new account for this identity.
    #[must_use]
    pub fn into_citizen(self, id: CitizenId, now: DateTime<Utc>) -> Citizen {
        let external_subject = match &self.lookup {
            CitizenLookup::ExternalSubject(subject) => Some(subject.clone()),
            CitizenLookup::Mobile(_) => None,
        };
        Citizen {
            id,
            mobile: self
                .mobile
                .as_ref()
                .map(|mobile| mobile.as_str().to_owned())
                .unwrap_or_default(),
            name: self.name,
            aadhaar_number: self.aadhaar_number,
            email: None,
            address: None,
            city: None,
            state: None,
            pincode: None,
            language: normalise_language(self.language.as_deref()),
            external_subject,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Outcome of provisioning: the account and whether it was just created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub citizen: Citizen,
    pub created: bool,
}

/// Name and mobile joined onto admin listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitizenSummary {
    pub name: Option<String>,
    pub mobile: Option<String>,
}

impl From<&Citizen> for CitizenSummary {
    fn from(citizen: &Citizen) -> Self {
        Self {
            name: citizen.name.clone(),
            mobile: Some(citizen.mobile.clone()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn normalise_language(language: Option<&str>) -> String {
    language
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_owned()
}
