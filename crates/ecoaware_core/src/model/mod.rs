//! Domain model for users, articles and campaigns.
//!
//! # Responsibility
//! - Define canonical records used by repositories and services.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable, non-nil `Uuid`.
//! - Timestamps are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod article;
pub mod campaign;
pub mod user;

/// Field-level validation failure for any domain record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NilId(&'static str),
    BlankField(&'static str),
    FieldTooLong {
        field: &'static str,
        max_chars: usize,
    },
    InvalidUsername(String),
    InvalidEmail(String),
    InvalidSlug(String),
    InvalidDateRange {
        start: i64,
        end: i64,
    },
    NegativeCounter {
        field: &'static str,
        value: i64,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId(field) => write!(f, "{field} must not be nil"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::InvalidUsername(value) => write!(
                f,
                "invalid username `{value}`: use letters, digits and @/./+/-/_ only"
            ),
            Self::InvalidEmail(value) => write!(f, "invalid email address `{value}`"),
            Self::InvalidSlug(value) => write!(f, "invalid slug `{value}`"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "end_date ({end}) must be >= start_date ({start})")
            }
            Self::NegativeCounter { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_chars {
        return Err(ValidationError::FieldTooLong { field, max_chars });
    }
    Ok(())
}

pub(crate) fn require_non_nil(field: &'static str, id: uuid::Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId(field));
    }
    Ok(())
}
