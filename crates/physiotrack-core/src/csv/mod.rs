//! CSV export and import of the patient roster.
//!
//! Format: a fixed header line, then one CRLF-terminated row per patient.
//! Scalar columns are written bare; `tags` is a quoted `;`-joined list and
//! `exercises`/`progress` are quoted JSON with inner quotes doubled.

mod export;
mod import;
mod scanner;

pub use export::*;
pub use import::*;
pub use scanner::*;

use thiserror::Error;

/// The exact header line. Also the acceptance check on import.
pub const CSV_HEADER: &str = "id,name,email,dateAdded,status,tags,exercises,progress";

/// Number of columns in every row.
pub const CSV_COLUMNS: usize = 8;

pub const ROW_TERMINATOR: &str = "\r\n";

pub const TAG_SEPARATOR: char = ';';

/// CSV errors.
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("Invalid CSV header format: {found:?}")]
    InvalidHeader { found: String },

    #[error("Failed to parse CSV line {line}: {reason}")]
    ParseFailure { line: usize, reason: String },

    #[error("No patient data to export.")]
    EmptyExport,

    #[error("Patient {patient_id} has a {field} value that cannot be written to CSV")]
    UnsafeField { patient_id: String, field: &'static str },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CsvResult<T> = Result<T, CsvError>;
