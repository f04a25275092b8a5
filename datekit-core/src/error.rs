//! Errors for the fallible edges of DateKit
//!
//! Calendar operations themselves are total and never return errors. Only
//! configuration, text parsing and building instants from components can fail.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_ZONE: &str = "INVALID_ZONE";
    pub const INVALID_WEEKDAY: &str = "INVALID_WEEKDAY";
    pub const INVALID_MINIMUM_DAYS: &str = "INVALID_MINIMUM_DAYS";
    pub const INVALID_DATE: &str = "INVALID_DATE";
    pub const DATE_PARSE_ERROR: &str = "DATE_PARSE_ERROR";
}

/// Error type for DateKit operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateKitError {
    #[error("Invalid time zone: {0}")]
    InvalidZone(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid minimum days in first week: {0} (must be 1-7)")]
    InvalidMinimumDays(u8),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DateKitError {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidZone(_) => codes::INVALID_ZONE,
            Self::InvalidWeekday(_) => codes::INVALID_WEEKDAY,
            Self::InvalidMinimumDays(_) => codes::INVALID_MINIMUM_DAYS,
            Self::InvalidDate(_) => codes::INVALID_DATE,
            Self::Parse(_) => codes::DATE_PARSE_ERROR,
        }
    }
}
