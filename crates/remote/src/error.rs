//! Remote Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A remote error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for remote operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Note that an HTTP error status is **not** an error at this layer; it's a
/// [`Response`](crate::Response) like any other.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The base URL could not be parsed, or isn't HTTP(S).
    #[display("invalid URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The HTTP client could not be constructed from the given options.
    #[display("could not build HTTP client")]
    Client,
    /// Connecting, sending the request or reading the body failed.
    #[display("transport error: {_0}")]
    Transport(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidUrl("ftp://x".to_string()).to_string(), "invalid URL: ftp://x");
        assert_eq!(ErrorKind::Transport("timed out".to_string()).to_string(), "transport error: timed out");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Transport("connection reset".to_string()).is_retryable());
        assert!(!ErrorKind::InvalidUrl(String::new()).is_retryable());
        assert!(!ErrorKind::Client.is_retryable());
    }
}
