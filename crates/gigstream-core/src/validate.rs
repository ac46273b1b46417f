//! Input validation for transaction forms.

use chrono::{DateTime, NaiveDate};

use crate::error::ErrorCode;

pub const MAX_TEXT_LEN: usize = 2_000;

/// A rejected form field, with a suggestion for fixing it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field} '{value}': {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub value: String,
    pub reason: String,
    pub suggestion: String,
    pub code: &'static str,
}

impl ValidationError {
    pub fn new(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
        code: &'static str,
    ) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
            suggestion: suggestion.into(),
            code,
        }
    }

    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidInput
    }
}

/// Trimmed value of a required free-text field.
///
/// # Errors
///
/// Fails when the trimmed value is empty, too long, or contains control
/// characters other than newlines and tabs.
pub fn required_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            field,
            value,
            "must not be empty",
            format!("provide a non-empty --{}", flag_name(field)),
            "missing_field",
        ));
    }
    check_text(field, trimmed)?;
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional free-text field; empty is allowed.
///
/// # Errors
///
/// Fails on the same length and character rules as [`required_text`].
pub fn optional_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    check_text(field, trimmed)?;
    Ok(trimmed.to_string())
}

fn check_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::new(
            field,
            value,
            format!("must be <= {MAX_TEXT_LEN} characters"),
            format!("shorten --{}", flag_name(field)),
            "text_too_long",
        ));
    }
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\t')
    {
        return Err(ValidationError::new(
            field,
            value,
            "must not contain control characters",
            format!("remove control characters from --{}", flag_name(field)),
            "invalid_text",
        ));
    }
    Ok(())
}

/// Budget in the smallest currency unit; must be positive.
///
/// # Errors
///
/// Fails for a zero budget.
pub fn positive_budget(budget: u64) -> Result<u64, ValidationError> {
    if budget == 0 {
        return Err(ValidationError::new(
            "budget",
            "0",
            "must be greater than zero",
            "pass a positive --budget",
            "invalid_budget",
        ));
    }
    Ok(budget)
}

/// Ledger object id: `0x` followed by 1 to 64 hex digits.
///
/// # Errors
///
/// Fails for anything else.
pub fn object_id(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let valid = trimmed.strip_prefix("0x").is_some_and(|hex| {
        !hex.is_empty() && hex.len() <= 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
    });
    if !valid {
        return Err(ValidationError::new(
            field,
            value,
            "must be 0x followed by up to 64 hex digits",
            "copy the id from an explorer or `gs profile` output",
            "invalid_object_id",
        ));
    }
    Ok(trimmed.to_string())
}

/// Parse a deadline and require it to lie strictly after `now_ms`.
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 timestamps, or raw
/// milliseconds since the Unix epoch.
///
/// # Errors
///
/// Fails when the input cannot be parsed or is not in the future.
pub fn future_deadline(input: &str, now_ms: u64) -> Result<u64, ValidationError> {
    let trimmed = input.trim();
    let parsed = trimmed
        .parse::<u64>()
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .and_then(|dt| u64::try_from(dt.and_utc().timestamp_millis()).ok())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .and_then(|dt| u64::try_from(dt.timestamp_millis()).ok())
        });

    let Some(deadline) = parsed else {
        return Err(ValidationError::new(
            "deadline",
            input,
            "not a date",
            "use YYYY-MM-DD, an RFC 3339 timestamp, or epoch milliseconds",
            "invalid_deadline",
        ));
    };

    if deadline <= now_ms {
        return Err(ValidationError::new(
            "deadline",
            input,
            "must be in the future",
            "pick a later --deadline",
            "deadline_in_past",
        ));
    }
    Ok(deadline)
}

fn flag_name(field: &str) -> String {
    field.replace('_', "-")
}
