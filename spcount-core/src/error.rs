//! Error types for spcount operations

use thiserror::Error;

/// Broad classification of an [`SpcountError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Structural violation of an input format
    Format,
    /// Non-integral or out-of-range value where an integer is required
    Value,
    /// Coordinate outside the declared matrix extent
    Bounds,
    /// Declared count disagrees with what was actually found
    Consistency,
    /// File, dataset or container could not be opened or read
    Io,
    /// API misuse (builder lifecycle, unsupported arguments)
    Usage,
}

impl core::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ErrorCategory::Format => "format",
            ErrorCategory::Value => "value",
            ErrorCategory::Bounds => "bounds",
            ErrorCategory::Consistency => "consistency",
            ErrorCategory::Io => "io",
            ErrorCategory::Usage => "usage",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur while reading, building or transforming a matrix
#[derive(Debug, Error)]
pub enum SpcountError {
    /// Structural violation in a text input (missing delimiter, wrong field count)
    #[error("format error on line {line}: {message}")]
    Format { line: usize, message: String },

    /// Structural violation in a binary dataset
    #[error("invalid dataset {path:?}: {message}")]
    Dataset { path: String, message: String },

    /// Non-integral value where an integer is required
    #[error("expected an integer on line {line}, column {column} but found {value:?}")]
    Value {
        line: usize,
        column: usize,
        value: String,
    },

    /// Coordinate outside the declared extent (1-based)
    #[error("coordinate ({row}, {col}) is out of bounds for a {nrow} x {ncol} matrix")]
    Bounds {
        row: u32,
        col: u32,
        nrow: usize,
        ncol: usize,
    },

    /// Declared vs. actual count mismatch
    #[error("{what}: expected {expected} but found {actual}")]
    Consistency {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Underlying I/O failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A required dataset is absent from a container
    #[error("dataset {0:?} not found")]
    MissingDataset(String),

    /// Builder lifecycle violation
    #[error("builder misuse: {0}")]
    Usage(&'static str),

    /// Unsupported argument (representation tag, file extension)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl SpcountError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            SpcountError::Format { .. } | SpcountError::Dataset { .. } => ErrorCategory::Format,
            SpcountError::Value { .. } => ErrorCategory::Value,
            SpcountError::Bounds { .. } => ErrorCategory::Bounds,
            SpcountError::Consistency { .. } => ErrorCategory::Consistency,
            SpcountError::Io { .. } | SpcountError::MissingDataset(_) => ErrorCategory::Io,
            SpcountError::Usage(_) | SpcountError::InvalidArgument(_) => ErrorCategory::Usage,
        }
    }

    /// Shorthand for a line-scoped format error
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        SpcountError::Format {
            line,
            message: message.into(),
        }
    }

    /// Shorthand for a dataset-scoped format error
    pub fn dataset(path: &str, message: impl Into<String>) -> Self {
        SpcountError::Dataset {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path or operation it came from
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SpcountError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for spcount operations
pub type Result<T> = core::result::Result<T, SpcountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(
            SpcountError::format(3, "bad").category(),
            ErrorCategory::Format
        );
        assert_eq!(
            SpcountError::dataset("matrix/shape", "bad").category(),
            ErrorCategory::Format
        );
        assert_eq!(
            SpcountError::MissingDataset("matrix/data".into()).category(),
            ErrorCategory::Io
        );
        assert_eq!(SpcountError::Usage("twice").category(), ErrorCategory::Usage);
    }

    #[test]
    fn test_messages_carry_location() {
        let err = SpcountError::Value {
            line: 4,
            column: 3,
            value: "1.5".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("column 3"));
        assert!(msg.contains("1.5"));

        let err = SpcountError::Bounds {
            row: 0,
            col: 2,
            nrow: 3,
            ncol: 3,
        };
        assert_eq!(
            err.to_string(),
            "coordinate (0, 2) is out of bounds for a 3 x 3 matrix"
        );
    }
}
