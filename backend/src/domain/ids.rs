//! UUID-backed identifiers for stored records.

use std::fmt;

/// Raised when an identifier string is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be a valid UUID")]
pub struct InvalidRecordId {
    kind: &'static str,
}

impl InvalidRecordId {
    /// Record kind whose identifier failed to parse.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_record_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(id: uuid::Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidRecordId;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(value)
                    .map(Self)
                    .map_err(|_| InvalidRecordId { kind: $kind })
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(value: uuid::Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_record_id!(
    /// Citizen account identifier; also the `sub` of citizen tokens.
    CitizenId => "citizen"
);
define_record_id!(
    /// Administrator account identifier.
    AdminId => "admin"
);
define_record_id!(BillId => "bill");
define_record_id!(PaymentId => "payment");
define_record_id!(ServiceRequestId => "service request");
define_record_id!(ComplaintId => "complaint");
define_record_id!(NotificationId => "notification");
define_record_id!(AnnouncementId => "announcement");
define_record_id!(OtpChallengeId => "otp challenge");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_uuid_strings() {
        let id: BillId = "7a0e3f1c-1111-4c2b-9a4e-0123456789ab"
            .parse()
            .expect("valid uuid");
        assert_eq!(id.to_string(), "7a0e3f1c-1111-4c2b-9a4e-0123456789ab");
    }

    #[test]
    fn rejection_names_the_record_kind() {
        let err = "nope".parse::<ComplaintId>().expect_err("not a uuid");
        assert_eq!(err.kind(), "complaint");
        assert_eq!(err.to_string(), "complaint id must be a valid UUID");
    }

    #[test]
    fn serialises_as_plain_string() {
        let id = CitizenId::random();
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }
}
