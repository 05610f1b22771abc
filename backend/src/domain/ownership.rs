//! Record visibility rules.
//!
//! Citizens only ever see their own records (and broadcast notifications).
//! A record owned by someone else is reported as absent so callers cannot
//! probe for identifiers.

use super::auth::Principal;
use super::error::Error;
use super::ids::CitizenId;

/// Records that belong to a citizen.
pub trait Owned {
    /// Owning citizen, or `None` for records shared with every citizen.
    fn owner(&self) -> Option<CitizenId>;
}

/// Whether `principal` may read or change `record`.
#[must_use]
pub fn is_visible_to<T: Owned + ?Sized>(record: &T, principal: &Principal) -> bool {
    if principal.is_admin() {
        return true;
    }
    match (record.owner(), principal.citizen_id()) {
        (None, Some(_)) => true,
        (Some(owner), Some(citizen)) => owner == citizen,
        (_, None) => false,
    }
}

/// Return `record` when visible, otherwise a not-found error with `missing`.
pub fn ensure_visible<T: Owned>(
    record: Option<T>,
    principal: &Principal,
    missing: &str,
) -> Result<T, Error> {
    match record {
        Some(found) if is_visible_to(&found, principal) => Ok(found),
        _ => Err(Error::not_found(missing)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use uuid::Uuid;

    struct Record(Option<CitizenId>);

    impl Owned for Record {
        fn owner(&self) -> Option<CitizenId> {
            self.0
        }
    }

    #[test]
    fn owner_sees_own_record() {
        let id = CitizenId::random();
        assert!(is_visible_to(&Record(Some(id)), &Principal::citizen(id)));
    }

    #[test]
    fn other_citizen_gets_not_found() {
        let record = Record(Some(CitizenId::random()));
        let err = ensure_visible(Some(record), &Principal::citizen(CitizenId::random()), "Bill not found")
            .err()
            .expect("foreign record hidden");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.detail(), "Bill not found");
    }

    #[test]
    fn shared_records_are_visible_to_any_citizen() {
        assert!(is_visible_to(
            &Record(None),
            &Principal::citizen(CitizenId::random())
        ));
    }

    #[test]
    fn admins_see_everything() {
        let admin = Principal::new(Uuid::new_v4(), Role::Admin);
        assert!(is_visible_to(&Record(Some(CitizenId::random())), &admin));
    }
}
