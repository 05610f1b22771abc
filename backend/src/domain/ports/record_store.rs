//! Errors shared by the record repositories and their mapping into domain
//! errors.

use tracing::error;

use crate::domain::Error;
use crate::domain::reference_code::{ReferenceAllocationError, ReferenceCollision};

use super::define_port_error;

define_port_error! {
    /// Failures raised by record repository adapters.
    pub enum RecordStoreError {
        /// The store could not be reached.
        Connection { message: String } => "record store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// A generated reference code is already taken.
        DuplicateReference { message: String } => "reference code already in use: {message}",
        /// The mobile number already belongs to another citizen.
        MobileTaken { mobile: String } => "mobile number {mobile} belongs to another citizen",
    }
}

impl ReferenceCollision for RecordStoreError {
    fn is_reference_collision(&self) -> bool {
        matches!(self, Self::DuplicateReference { .. })
    }
}

impl RecordStoreError {
    /// Map to a domain error, logging the underlying cause.
    ///
    /// `subject` names the repository in the log and client message.
    #[must_use]
    pub fn into_domain(self, subject: &str) -> Error {
        error!(
            repository = subject,
            failure = self.variant_name(),
            error = %self,
            "record store failure"
        );
        match self {
            Self::Connection { .. } => {
                Error::service_unavailable(format!("{subject} repository unavailable"))
            }
            Self::Query { .. } | Self::DuplicateReference { .. } => {
                Error::internal(format!("{subject} repository error"))
            }
            Self::MobileTaken { .. } => {
                Error::invalid_state("Mobile number already registered to another account")
            }
        }
    }
}

/// Map a failed reference allocation to a domain error.
pub fn map_allocation_error(
    error: ReferenceAllocationError<RecordStoreError>,
    subject: &str,
) -> Error {
    match error {
        ReferenceAllocationError::Repository(inner) => inner.into_domain(subject),
        ReferenceAllocationError::Exhausted { label } => {
            error!(record = label, "reference code space exhausted");
            Error::internal(format!("could not allocate a {label} reference"))
        }
    }
}
