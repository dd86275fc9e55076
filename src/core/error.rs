//! Error handling and error types for composite Bayesian models.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is [`CompositeError`]. None of the errors are retried internally: they are
//! surfaced to the caller of the operation that triggered them.

use std::io;
use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum CompositeError {
    /// Not enough entries, distinct values or cut-point candidates
    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },

    /// Segment lists, bin counts or reconstruction inputs that cannot work
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Failure reported by a classifier or feature extractor
    #[error("Classifier failure: {message}")]
    ClassifierFailure { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Internal library errors (should not occur in normal usage)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Type alias for Results using CompositeError
pub type Result<T> = std::result::Result<T, CompositeError>;

impl CompositeError {
    /// Create an insufficient data error
    pub fn insufficient_data<S: Into<String>>(message: S) -> Self {
        CompositeError::InsufficientData {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        CompositeError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a classifier failure
    pub fn classifier<S: Into<String>>(message: S) -> Self {
        CompositeError::ClassifierFailure {
            message: message.into(),
        }
    }

    /// Create a configuration file error
    pub fn config<S: Into<String>>(message: S) -> Self {
        CompositeError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        CompositeError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an internal error (should be used sparingly)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        CompositeError::Internal {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CompositeError::InsufficientData { .. } => "insufficient_data",
            CompositeError::InvalidConfiguration { .. } => "invalid_configuration",
            CompositeError::ClassifierFailure { .. } => "classifier_failure",
            CompositeError::InvalidParameter { .. } => "invalid_parameter",
            CompositeError::Config { .. } => "config",
            CompositeError::IO { .. } => "io",
            CompositeError::Json { .. } => "json",
            CompositeError::Internal { .. } => "internal",
        }
    }
}

/// Build an [`CompositeError::InsufficientData`] from a message or format string
#[macro_export]
macro_rules! insufficient_data {
    ($msg:expr) => {
        $crate::core::error::CompositeError::insufficient_data($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::CompositeError::insufficient_data(format!($fmt, $($arg)*))
    };
}

/// Build an [`CompositeError::InvalidConfiguration`] from a message or format string
#[macro_export]
macro_rules! invalid_configuration {
    ($msg:expr) => {
        $crate::core::error::CompositeError::invalid_configuration($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::CompositeError::invalid_configuration(format!($fmt, $($arg)*))
    };
}

/// Return early with an error when a condition does not hold
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CompositeError::insufficient_data("no entries");
        assert_eq!(err.category(), "insufficient_data");

        let err = CompositeError::invalid_configuration("too many segments");
        assert_eq!(err.category(), "invalid_configuration");

        let err = CompositeError::classifier("bad sample");
        assert_eq!(err.category(), "classifier_failure");
    }

    #[test]
    fn test_error_macros() {
        let err = insufficient_data!("only {} entries", 2);
        assert!(matches!(err, CompositeError::InsufficientData { .. }));

        let err = invalid_configuration!("boundary mismatch");
        assert!(matches!(err, CompositeError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_ensure_macro() {
        fn check(n: usize) -> Result<usize> {
            ensure!(n > 2, CompositeError::insufficient_data("need more"));
            Ok(n)
        }
        assert!(check(3).is_ok());
        assert!(matches!(check(1), Err(CompositeError::InsufficientData { .. })));
    }

    #[test]
    fn test_parameter_errors() {
        let err = CompositeError::invalid_parameter("min_bin_fraction", "1.5", "must be in (0, 1)");
        assert_eq!(err.category(), "invalid_parameter");
        let text = err.to_string();
        assert!(text.contains("min_bin_fraction"));
        assert!(text.contains("1.5"));
    }

    #[test]
    fn test_error_display() {
        let err = CompositeError::invalid_configuration("test message");
        let error_string = format!("{}", err);
        assert!(error_string.contains("Invalid configuration"));
        assert!(error_string.contains("test message"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: CompositeError = io_err.into();
        assert!(matches!(err, CompositeError::IO { .. }));
        assert_eq!(err.category(), "io");
    }
}
