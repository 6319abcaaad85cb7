//! Error types for the media-trends library.
//!
//! All errors are represented by the [`TrendsError`] enum, built with
//! `thiserror`. Generation, aggregation and export either fully succeed or
//! return one of these; nothing is retried or partially recovered.

use thiserror::Error;

/// The main error type for the media-trends library.
#[derive(Error, Debug)]
pub enum TrendsError {
    /// A distribution or operation received malformed parameters.
    #[error("Invalid parameter '{parameter}': {message}")]
    InvalidParameter {
        /// Name of the offending parameter
        parameter: String,
        /// Detailed error message
        message: String,
    },

    /// An aggregation referenced a column that the table does not declare.
    #[error("Column '{column}' not found in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A column exists but has the wrong semantic type for the operation.
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: String,
        found: String,
    },

    /// Table contents do not conform to the declared schema.
    #[error("Schema violation in table '{table}', column '{column}', row {row}: {message}")]
    SchemaViolation {
        table: String,
        column: String,
        row: usize,
        message: String,
    },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from Arrow operations.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Error from I/O operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error while rendering charts.
    #[error("Chart rendering error: {0}")]
    Chart(String),

    /// Error while writing formatted output.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    /// An error annotated with the operation that produced it.
    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<TrendsError>,
    },
}

/// A type alias for `Result<T, TrendsError>`.
pub type Result<T> = std::result::Result<T, TrendsError>;

impl TrendsError {
    /// Creates a new invalid parameter error.
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Creates a new unknown column error.
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Creates a new type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a new schema violation error.
    pub fn schema_violation(
        table: impl Into<String>,
        column: impl Into<String>,
        row: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            table: table.into(),
            column: column.into(),
            row,
            message: message.into(),
        }
    }

    /// Returns the innermost error, skipping any context layers.
    pub fn root_cause(&self) -> &TrendsError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl From<serde_json::Error> for TrendsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TrendsError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| TrendsError::Context {
            message: msg.to_string(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TrendsError::Context {
            message: f(),
            source: Box::new(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_parameter_message() {
        let err = TrendsError::invalid_parameter("weights", "must sum to 1");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'weights': must sum to 1"
        );
    }

    #[test]
    fn test_unknown_column_message() {
        let err = TrendsError::unknown_column("usage", "Bogus");
        assert_eq!(err.to_string(), "Column 'Bogus' not found in table 'usage'");
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = TrendsError::type_mismatch("Platform", "numeric", "categorical");
        assert_eq!(
            err.to_string(),
            "Type mismatch for column 'Platform': expected numeric, found categorical"
        );
    }

    #[test]
    fn test_context_preserves_source() {
        fn failing() -> std::result::Result<(), std::io::Error> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            ))
        }

        let err = failing().context("writing usage.csv").unwrap_err();
        assert!(err.to_string().starts_with("writing usage.csv"));
        assert!(err.source().is_some());
        assert!(matches!(err.root_cause(), TrendsError::Io(_)));
    }

    #[test]
    fn test_with_context_is_lazy() {
        let ok: std::result::Result<u8, TrendsError> = Ok(1);
        let value = ok
            .with_context(|| panic!("context must not be built on success"))
            .unwrap();
        assert_eq!(value, 1);
    }
}
