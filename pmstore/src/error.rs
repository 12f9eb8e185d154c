//! Error types for the PMStore library.

use thiserror::Error;

/// Errors that can occur when working with the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record carries the requested Id.
    #[error("Record not found: Id={id}")]
    NotFound { id: u64 },

    /// An insert was missing one or more required fields.
    #[error("Missing required fields: {}.", .missing.join(", "))]
    InvalidInput { missing: Vec<&'static str> },

    /// The dataset header lacks a required column.
    #[error("Dataset is missing required column: {column}")]
    MissingColumn { column: &'static str },

    /// A cell in a numeric column could not be parsed.
    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// CSV reading or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error when reading or writing dataset files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// `PMSTORE_DATA_FILE` is not set.
    #[error("PMSTORE_DATA_FILE environment variable not set")]
    MissingDataFile,
}

/// Result type alias using [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
