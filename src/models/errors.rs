use thiserror::Error;

use crate::types::NumericError;

/// Why a single input line was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("Expected {expected} fields but found {found}")]
    FieldCount {
        expected: usize,
        found: usize
    },
    #[error("Transaction id is missing")]
    MissingId,
    #[error("Required field [{field}] is empty")]
    MissingField {
        field: &'static str
    },
    #[error("Invalid numeric value [{value}] for [{field}]: {detail}")]
    InvalidNumeric {
        field: &'static str,
        value: String,
        detail: String
    },
    #[error("Invalid date [{value}]: expected YYYY-MM-DD")]
    InvalidDate {
        value: String
    }
}

impl RejectReason {
    pub fn invalid_numeric(field: &'static str, value: &str, error: NumericError) -> Self {
        Self::InvalidNumeric {
            field,
            value: value.to_string(),
            detail: error.to_string()
        }
    }

    pub fn invalid_date(value: &str) -> Self {
        Self::InvalidDate { value: value.to_string() }
    }

    /// Stable short name used when summarising rejections by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FieldCount { .. } => "FieldCount",
            Self::MissingId => "MissingId",
            Self::MissingField { .. } => "MissingField",
            Self::InvalidNumeric { .. } => "InvalidNumeric",
            Self::InvalidDate { .. } => "InvalidDate"
        }
    }
}

/// Diagnostic for a rejected input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// 1-based physical line number in the decoded input.
    pub line: u64,
    pub reason: RejectReason
}
