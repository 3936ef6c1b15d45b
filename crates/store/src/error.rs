//! Error types for the pin store

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding or encoding persisted pin data
///
/// Store operations themselves never fail; these only come from the
/// persisted-shape helpers on [`crate::TopMostData`].
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while writing to a caller-supplied sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
