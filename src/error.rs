//! Error types for dafi.

use thiserror::Error;

/// The main error type for dafi operations.
#[derive(Debug, Error)]
pub enum DafiError {
    /// A DSL line does not match the filter grammar.
    #[error("invalid filter format at line {line}: '{input}', format is: (( @field OPERATOR [value] )) AND|OR")]
    InvalidFilterFormat { line: usize, input: String },

    /// Operator token outside the recognized set.
    #[error("invalid operator: '{0}'")]
    InvalidOperator(String),

    /// Connective other than `AND` / `OR`.
    #[error("invalid chaining key: '{0}', expected AND or OR")]
    InvalidChainingKey(String),

    /// An `IN` list element could not be converted to the type inferred for the list.
    #[error("cannot convert '{value}' to {expected}")]
    TypeConversion {
        value: String,
        expected: &'static str,
    },

    /// A value that does not fit the operator it is attached to.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Malformed sort expression.
    #[error("invalid sort expression: {0}")]
    InvalidSort(String),

    /// Malformed pagination part.
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DafiError {
    /// Create an invalid filter format error for the given (1-based) line.
    pub fn format(line: usize, input: impl Into<String>) -> Self {
        Self::InvalidFilterFormat {
            line,
            input: input.into(),
        }
    }

    /// Create a type conversion error.
    pub fn conversion(value: impl Into<String>, expected: &'static str) -> Self {
        Self::TypeConversion {
            value: value.into(),
            expected,
        }
    }
}

/// Result type alias for dafi operations.
pub type DafiResult<T> = Result<T, DafiError>;
