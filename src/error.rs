//! Error types for u-eda.

use thiserror::Error;

/// All errors produced by u-eda operations.
#[derive(Error, Debug)]
pub enum EdaError {
    /// CSV parsing failed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },

    /// Column not found in the DataFrame.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// Column is not numeric where numeric data is required.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },

    /// Column lengths disagree.
    #[error("expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Not enough data to draw or compute the requested output.
    #[error("need at least {min_required} rows, got {actual}")]
    InsufficientData { min_required: usize, actual: usize },

    /// Chart rendering failed inside the drawing backend.
    #[error("failed to render chart: {0}")]
    Plot(String),

    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = EdaError::CsvParse {
            line: 4,
            message: "expected 3 fields, got 2".into(),
        };
        assert_eq!(
            err.to_string(),
            "CSV parse error at line 4: expected 3 fields, got 2"
        );

        let err = EdaError::ColumnNotFound {
            name: "Churn Score".into(),
        };
        assert_eq!(err.to_string(), "column 'Churn Score' not found");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "data.csv");
        let err: EdaError = io.into();
        assert!(matches!(err, EdaError::Io(_)));
        assert!(err.to_string().starts_with("I/O error"));
    }
}
