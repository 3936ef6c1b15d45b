use thiserror::Error;

/// Result type alias for launchpin-core
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the launchpin pin subsystem
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error for file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A plugin supplied an equality pattern the regex engine rejected
    ///
    /// Raised when the pattern is compiled, never while matching.
    #[error("invalid equality pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern { pattern: pattern.into(), source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing section");
        assert_eq!(err.to_string(), "configuration error: missing section");
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = Error::invalid_pattern("(unclosed", source);

        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
