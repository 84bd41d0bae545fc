//! Error types for readflow.
//!
//! Layout reconstruction itself is pure geometry and does not fail: malformed
//! tokens are dropped and empty pages produce empty text. Errors only come from
//! the edges of the crate:
//!
//! - `ReadflowError::Io` (from `std::io::Error`) - reading input or config files.
//!   These always bubble up unchanged.
//! - `Parsing` - OCR exports that cannot be decoded at all
//! - `Validation` - invalid configuration values or missing files
//! - `Serialization` - JSON encoding/decoding failures
//! - `UnsupportedFormat` - input files with an unknown extension
//!
//! # Example
//!
//! ```rust
//! use readflow::{ReadflowError, Result};
//!
//! fn load(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path)?;
//!
//!     if content.trim().is_empty() {
//!         return Err(ReadflowError::validation(format!("Input is empty: {}", path)));
//!     }
//!
//!     Ok(content)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `ReadflowError`.
pub type Result<T> = std::result::Result<T, ReadflowError>;

/// Main error type for all readflow operations.
#[derive(Debug, Error)]
pub enum ReadflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ReadflowError {
    fn from(err: serde_json::Error) -> Self {
        ReadflowError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl ReadflowError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReadflowError = io_err.into();
        assert!(matches!(err, ReadflowError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_parsing_error() {
        let err = ReadflowError::parsing("invalid export");
        assert_eq!(err.to_string(), "Parsing error: invalid export");
    }

    #[test]
    fn test_parsing_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad data");
        let err = ReadflowError::parsing_with_source("invalid export", source);
        assert_eq!(err.to_string(), "Parsing error: invalid export");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_error() {
        let err = ReadflowError::validation("line_tolerance must be positive");
        assert_eq!(err.to_string(), "Validation error: line_tolerance must be positive");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_serialization_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad format");
        let err = ReadflowError::serialization_with_source("JSON encode failed", source);
        assert_eq!(err.to_string(), "Serialization error: JSON encode failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_unsupported_format_error() {
        let err = ReadflowError::UnsupportedFormat("pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported format: pdf");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ReadflowError = json_err.into();
        assert!(matches!(err, ReadflowError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_input() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/page.json")?;
            Ok(content)
        }

        let result = read_input();
        assert!(matches!(result.unwrap_err(), ReadflowError::Io(_)));
    }
}
