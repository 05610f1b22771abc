//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `InvalidRequest` error whose context names the
//! offending field and a stable machine-readable code.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{
    AuthValidationError, Error, FixedPoint, FixedPointError, InvalidRecordId, UnknownLabel,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidChoice,
    InvalidDate,
    InvalidAmount,
    InvalidFormat,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidChoice => "invalid_choice",
            Self::InvalidDate => "invalid_date",
            Self::InvalidAmount => "invalid_amount",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_context(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(
    field: FieldName,
    code: ErrorCode,
    value: &str,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_context(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Trim `value` and reject it when nothing remains.
pub(crate) fn require_text(value: &str, field: FieldName) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(missing_field_error(field));
    }
    Ok(trimmed.to_owned())
}

/// Trim optional free text, treating blank input as absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Parse a record identifier from a path segment or body field.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = InvalidRecordId>,
{
    let name = field.as_str();
    value.trim().parse().map_err(|_: InvalidRecordId| {
        field_value_error(
            field,
            ErrorCode::InvalidUuid,
            value,
            format!("{name} must be a valid UUID"),
        )
    })
}

/// Parse a label-backed enumeration such as a status or category.
pub(crate) fn parse_label<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownLabel>,
{
    value.parse().map_err(|err: UnknownLabel| {
        Error::invalid_request(err.to_string()).with_context(json!({
            "field": field.as_str(),
            "value": err.value(),
            "expected": err.expected(),
            "code": ErrorCode::InvalidChoice.as_str(),
        }))
    })
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    let name = field.as_str();
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        field_value_error(
            field,
            ErrorCode::InvalidDate,
            value,
            format!("{name} must be a YYYY-MM-DD date"),
        )
    })
}

/// Convert a non-negative decimal quantity to fixed point.
pub(crate) fn parse_quantity(value: f64, field: FieldName) -> Result<FixedPoint, Error> {
    let name = field.as_str();
    FixedPoint::try_from_non_negative_f64(value).map_err(|err: FixedPointError| {
        field_error(field, ErrorCode::InvalidAmount, format!("{name}: {err}"))
    })
}

pub(crate) fn map_auth_validation_error(err: &AuthValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_context(json!({
        "field": err.field(),
        "code": ErrorCode::InvalidFormat.as_str(),
    }))
}
