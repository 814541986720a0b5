//! Error handling for ChocoMold
//!
//! Only a document that cannot be parsed is a hard error for the geometry
//! pipeline. Every geometric stage degrades its output instead of failing,
//! so the remaining variants cover parameters and I/O at the edges.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for ChocoMold
#[derive(Error, Debug)]
pub enum Error {
    /// The pattern document is not well-formed enough to extract any path
    #[error("Failed to parse pattern document: {reason}")]
    Parse {
        /// What made the document unusable.
        reason: String,
    },

    /// A caller-supplied parameter is outside its accepted range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a parse error
    pub fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }

    /// Create an invalid-parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a document parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::parse("missing <svg> element");
        assert_eq!(
            err.to_string(),
            "Failed to parse pattern document: missing <svg> element"
        );

        let err = Error::invalid_parameter("depth", "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter 'depth': must be positive");
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::parse("x").is_parse_error());
        assert!(!Error::invalid_parameter("x", "y").is_parse_error());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
