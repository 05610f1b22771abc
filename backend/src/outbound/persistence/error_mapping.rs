//! Translation of pool and Diesel failures into record store errors.

use std::str::FromStr;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::UnknownLabel;
use crate::domain::ports::RecordStoreError;

use super::pool::PoolError;

/// Pool failures always mean the database is unreachable.
pub(crate) fn map_pool_error(error: PoolError) -> RecordStoreError {
    RecordStoreError::connection(error.into_message())
}

/// Map a Diesel failure.
///
/// Unique violations become [`RecordStoreError::DuplicateReference`] so the
/// services can retry reference-code allocation; the constraint name is
/// kept as the message.
pub(crate) fn map_diesel_error(error: DieselError) -> RecordStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => RecordStoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => RecordStoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            RecordStoreError::duplicate_reference(
                info.constraint_name().unwrap_or("unique constraint"),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RecordStoreError::connection("database connection error")
        }
        _ => RecordStoreError::query("database error"),
    }
}

/// Parse a label column, treating unknown labels as corrupt data.
pub(crate) fn parse_label<T>(column: &str, value: &str) -> Result<T, RecordStoreError>
where
    T: FromStr<Err = UnknownLabel>,
{
    value
        .parse()
        .map_err(|err: UnknownLabel| RecordStoreError::query(format!("invalid {column}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BillStatus;
    use rstest::rstest;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, RecordStoreError::connection("timed out"));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(DieselError::RollbackTransaction)]
    fn other_diesel_errors_are_query_failures(#[case] error: DieselError) {
        assert!(matches!(
            map_diesel_error(error),
            RecordStoreError::Query { .. }
        ));
    }

    #[rstest]
    fn labels_parse_or_report_the_column() {
        let status: BillStatus = parse_label("bill status", "paid").expect("known label");
        assert_eq!(status, BillStatus::Paid);

        let err = parse_label::<BillStatus>("bill status", "void").expect_err("unknown label");
        assert!(err.to_string().contains("invalid bill status"));
    }
}
