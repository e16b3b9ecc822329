//! Error types for the company deduplication library.
//!
//! The grouping and merge stages have no recoverable failures; everything
//! here is raised either while validating input/configuration or while
//! normalizing raw field values.

use thiserror::Error;

use crate::models::core::{Column, RowId};

#[derive(Error, Debug)]
pub enum DedupeError {
    /// Non-null latitude/longitude that does not parse as a finite float
    #[error("Malformed number in row {row_id}, column {column}: {raw:?}")]
    MalformedNumber {
        row_id: RowId,
        column: Column,
        raw: String,
    },

    /// Expected column absent from the input schema or a group key
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// Two input rows carry the same row id
    #[error("Duplicate row id: {0}")]
    DuplicateRowId(RowId),

    /// A grouping key with no usable column
    #[error("Empty group key: {0}")]
    EmptyGroupKey(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DedupeResult<T> = std::result::Result<T, DedupeError>;
