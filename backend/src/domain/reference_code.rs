//! Human-readable reference codes printed on bills, receipts and tickets.
//!
//! A code is a fixed prefix followed by a fixed number of digits, e.g.
//! `CMP1294837`. Storage enforces uniqueness per kind; services allocate a
//! code, attempt the insert, and draw a fresh code when the store reports a
//! collision.

use std::future::Future;

use rand::Rng;
use tracing::warn;

/// Number of codes tried before an insert is abandoned.
pub const MAX_REFERENCE_ATTEMPTS: u32 = 5;

/// The families of reference codes issued by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `BILL` + 7 digits.
    Bill,
    /// `TXN` + 9 digits.
    Transaction,
    /// `RCP` + 6 digits.
    Receipt,
    /// `SR` + 7 digits.
    ServiceRequest,
    /// `CMP` + 7 digits.
    Complaint,
}

impl ReferenceKind {
    /// Literal prefix of the code.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Bill => "BILL",
            Self::Transaction => "TXN",
            Self::Receipt => "RCP",
            Self::ServiceRequest => "SR",
            Self::Complaint => "CMP",
        }
    }

    /// Number of digits after the prefix.
    #[must_use]
    pub const fn digits(self) -> u32 {
        match self {
            Self::Bill | Self::ServiceRequest | Self::Complaint => 7,
            Self::Transaction => 9,
            Self::Receipt => 6,
        }
    }

    /// Inclusive numeric range; the leading digit is never zero.
    #[must_use]
    pub const fn numeric_range(self) -> (u64, u64) {
        let digits = self.digits();
        (10_u64.pow(digits - 1), 10_u64.pow(digits) - 1)
    }

    /// Whether `candidate` is shaped like a code of this kind.
    #[must_use]
    pub fn matches(self, candidate: &str) -> bool {
        candidate.strip_prefix(self.prefix()).is_some_and(|digits| {
            digits.len() == self.digits() as usize
                && digits.bytes().all(|byte| byte.is_ascii_digit())
                && !digits.starts_with('0')
        })
    }
}

/// A reference code such as `TXN482910335`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceCode(String);

impl ReferenceCode {
    /// Wrap a stored code without validation.
    ///
    /// Codes read back from storage were validated when issued.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the code text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the code text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of candidate reference codes.
#[cfg_attr(test, mockall::automock)]
pub trait ReferenceCodeGenerator: Send + Sync {
    /// Produce a candidate code of `kind`. Candidates may repeat.
    fn generate(&self, kind: ReferenceKind) -> ReferenceCode;
}

/// Uniformly random codes drawn from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomReferenceCodes;

impl ReferenceCodeGenerator for RandomReferenceCodes {
    fn generate(&self, kind: ReferenceKind) -> ReferenceCode {
        let (low, high) = kind.numeric_range();
        let number = rand::thread_rng().gen_range(low..=high);
        ReferenceCode(format!("{}{number}", kind.prefix()))
    }
}

/// Repository errors that can signal a reference-code collision.
pub trait ReferenceCollision {
    /// True when the failure was a duplicate reference code.
    fn is_reference_collision(&self) -> bool;
}

/// Outcome of [`retry_on_reference_collision`] when no insert succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceAllocationError<E> {
    /// Every attempt collided.
    Exhausted {
        /// What was being created, for diagnostics.
        label: &'static str,
    },
    /// A non-collision failure from the repository.
    Repository(E),
}

/// Run `attempt` until it succeeds, retrying only on reference collisions.
///
/// `attempt` is expected to draw fresh codes on every call.
pub async fn retry_on_reference_collision<T, E, F, Fut>(
    label: &'static str,
    mut attempt: F,
) -> Result<T, ReferenceAllocationError<E>>
where
    E: ReferenceCollision,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    for attempt_number in 1..=MAX_REFERENCE_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_reference_collision() => {
                warn!(
                    record = label,
                    attempt = attempt_number,
                    "reference code collision; drawing a new code"
                );
            }
            Err(error) => return Err(ReferenceAllocationError::Repository(error)),
        }
    }
    Err(ReferenceAllocationError::Exhausted { label })
}
