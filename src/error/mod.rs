//! Error handling for the pipeline.
//!
//! Domain failures are described by [`Error`] and travel through
//! `anyhow::Result` so every stage can attach its own context.

pub mod util;

use std::path::PathBuf;

/// Failures raised by the pipeline stages
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Expected column is absent from a table
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Column exists but cannot be converted to the needed type
    #[error("Column '{column}' cannot be read as {expected}")]
    ColumnType { column: String, expected: String },

    /// Join keys of the two tables cannot be compared
    #[error("Cannot join on '{column}': left key is {left}, right key is {right}")]
    KeyTypeMismatch {
        column: String,
        left: String,
        right: String,
    },

    /// Table has no rows to derive the category names from
    #[error("Table is empty, no category names can be derived")]
    EmptyTable,

    /// Encoded categories field is null
    #[error("Row {row}: categories field is empty")]
    MissingCategories { row: usize },

    /// Encoded categories field does not fit the derived column set
    #[error("Row {row}: expected {expected} category fragments, found {found}")]
    CategoryShape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Trailing character of a fragment is not a digit
    #[error("Row {row}: value '{value}' of category '{column}' is not an integer")]
    InvalidCategoryValue {
        column: String,
        row: usize,
        value: String,
    },

    /// Destination table exists and the write policy forbids touching it
    #[error("Table '{table}' already exists in {}", path.display())]
    TableExists { table: String, path: PathBuf },
}

/// Result type for pipeline operations
pub type Result<T> = anyhow::Result<T>;
