//! Error taxonomy shared by the core and its adapters.
//!
//! Storage failures are split by what a caller can do about them:
//! `Unavailable` may succeed on a later attempt, everything else will not.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    /// The backing store cannot be opened or written right now.
    #[error("Forecast store unavailable: {0}")]
    Unavailable(String),

    /// The database file is damaged or is not a database at all.
    #[error("Forecast store is corrupt: {0}")]
    Corrupt(String),

    /// A write was rejected by a schema constraint.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// The record was rejected before reaching the store.
    #[error("Invalid record: {field} {reason}")]
    InvalidRecord {
        field: &'static str,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    /// A fetched forecast document could not be decoded.
    #[error("Malformed forecast payload: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ForecastError::InvalidRecord {
            field,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call later could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ForecastError::Unavailable(_))
    }
}
