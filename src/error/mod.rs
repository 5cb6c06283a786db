//! Error handling for cohort timeline operations.

use arrow::datatypes::DataType;
use arrow::error::ArrowError;

/// Errors that can occur while building timelines from cohort tables
#[derive(Debug, thiserror::Error)]
pub enum CohortError {
    /// A date value could not be resolved to a calendar date
    #[error("Malformed date value: '{value}'")]
    MalformedDate {
        /// The offending raw value
        value: String,
    },

    /// The requested number of longitudinal columns is not positive
    #[error("Invalid column count: {requested} (at least one column is required)")]
    InvalidColumnCount {
        /// The requested column count
        requested: usize,
    },

    /// Delta and interval column counts disagree
    #[error("Column alignment error: {deltas} delta columns but {intervals} interval columns")]
    ColumnAlignment {
        /// Number of delta columns that would be produced
        deltas: usize,
        /// Number of interval columns that would be produced
        intervals: usize,
    },

    /// A required column is missing from a table
    #[error("Column not found: {column}")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// A column has a data type the operation cannot use
    #[error("Column '{column}' has type {actual:?}, expected {expected}")]
    InvalidColumnType {
        /// Name of the column
        column: String,
        /// Human-readable description of the accepted types
        expected: String,
        /// The actual Arrow data type
        actual: DataType,
    },

    /// A non-nullable column contains a null
    #[error("Null value in column '{column}' at row {row}")]
    NullValue {
        /// Name of the column
        column: String,
        /// Row index of the null
        row: usize,
    },

    /// Structural validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Result type for cohort timeline operations
pub type Result<T> = std::result::Result<T, CohortError>;

impl CohortError {
    /// Create a malformed date error for a raw value
    pub fn malformed_date(value: impl Into<String>) -> Self {
        Self::MalformedDate {
            value: value.into(),
        }
    }

    /// Create a column-not-found error
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }

    /// Create a validation error with a formatted message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
