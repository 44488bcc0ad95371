//! Unified error types for the attendance admin backend.
//!
//! Every fallible operation in `core`, `config` and `api` returns [`Result`].
//! Row-level import failures are not errors at this level; they are collected
//! by [`crate::core::import`] and reported in the import summary.

use crate::entities::product::DurationUnit;
use chrono::NaiveDate;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable cause
        message: String,
    },

    /// Error reported by the data store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Request input failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable cause
        message: String,
    },

    /// No product with this id exists
    #[error("Product not found: {id}")]
    ProductNotFound {
        /// Requested product id
        id: String,
    },

    /// No member with this id exists
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// Requested member id
        id: String,
    },

    /// No coach with this id exists
    #[error("Coach not found: {id}")]
    CoachNotFound {
        /// Requested coach id
        id: String,
    },

    /// No administrator with this id exists
    #[error("Admin not found: {id}")]
    AdminNotFound {
        /// Requested admin id
        id: String,
    },

    /// The write would violate a uniqueness rule
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable cause
        message: String,
    },

    /// Login with an unknown username or a wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The uploaded spreadsheet could not be read at all
    #[error("Unreadable spreadsheet: {message}")]
    Spreadsheet {
        /// Reader error description
        message: String,
    },

    /// An export or template workbook could not be produced
    #[error("Spreadsheet could not be written: {message}")]
    SpreadsheetWrite {
        /// Writer error description
        message: String,
    },

    /// A computed membership end date falls outside the supported calendar
    #[error("End date out of range: {start} + {count} {unit}")]
    DateOutOfRange {
        /// Membership start date
        start: NaiveDate,
        /// Duration count that overflowed
        count: i32,
        /// Duration unit
        unit: DurationUnit,
    },
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Self::Spreadsheet {
            message: value.to_string(),
        }
    }
}

impl From<calamine::Error> for Error {
    fn from(value: calamine::Error) -> Self {
        Self::Spreadsheet {
            message: value.to_string(),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::SpreadsheetWrite {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
