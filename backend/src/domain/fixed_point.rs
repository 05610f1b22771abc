//! Two-decimal fixed-point quantities (rupee amounts, meter readings).
//!
//! Values are held as integer hundredths so arithmetic and storage stay exact;
//! conversion to `f64` happens only when shaping responses.

/// Errors raised when converting floating-point input.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum FixedPointError {
    /// Input was NaN or infinite.
    #[error("value must be a finite number")]
    NotFinite,
    /// Input magnitude does not fit the storage range.
    #[error("value {0} is out of range")]
    OutOfRange(f64),
    /// Input was negative where only non-negative values are accepted.
    #[error("value must not be negative")]
    Negative,
}

/// Fixed-point number with two fractional digits.
///
/// # Examples
/// ```
/// use suvidha::domain::FixedPoint;
///
/// let amount = FixedPoint::try_from_f64(1250.5).unwrap();
/// assert_eq!(amount.hundredths(), 125_050);
/// assert_eq!(amount.to_string(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FixedPoint(i64);

/// Largest magnitude accepted from floating-point input (1e13 units).
const MAX_HUNDREDTHS: i64 = 1_000_000_000_000_000;

impl FixedPoint {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Build from integer hundredths (paise for amounts).
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Integer hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Round a float to the nearest hundredth.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        reason = "bounded conversion from client-supplied decimals"
    )]
    pub fn try_from_f64(value: f64) -> Result<Self, FixedPointError> {
        if !value.is_finite() {
            return Err(FixedPointError::NotFinite);
        }
        let scaled = (value * 100.0).round();
        #[expect(
            clippy::cast_precision_loss,
            reason = "the bound is exactly representable"
        )]
        let limit = MAX_HUNDREDTHS as f64;
        if scaled.abs() > limit {
            return Err(FixedPointError::OutOfRange(value));
        }
        Ok(Self(scaled as i64))
    }

    /// Like [`Self::try_from_f64`] but rejects negative input.
    pub fn try_from_non_negative_f64(value: f64) -> Result<Self, FixedPointError> {
        let parsed = Self::try_from_f64(value)?;
        if parsed.0 < 0 {
            return Err(FixedPointError::Negative);
        }
        Ok(parsed)
    }

    /// Floating-point view used by response payloads.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "response shaping converts fixed-point to JSON numbers"
    )]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Sum that saturates instead of overflowing.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl std::iter::Sum for FixedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}
