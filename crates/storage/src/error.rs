//! Storage Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A storage error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("nothing saved at {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// The mirror (or part of it) can't be written to.
    #[display("not allowed to write {}", _0.display())]
    ReadOnly(#[error(not(source))] PathBuf),
    /// Anything else the filesystem complained about.
    #[display("filesystem error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    /// Escapes the mirror root, or isn't a usable path at all.
    #[display("refusing path {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    pub(crate) fn from_io(source: std::io::Error, path: &std::path::Path) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::ReadOnlyFilesystem => Self::ReadOnly(path),
            _ => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::ErrorKind as IoKind;
    use std::path::Path;

    #[rstest]
    #[case(IoKind::NotFound, "nothing saved at .git/HEAD", false)]
    #[case(IoKind::PermissionDenied, "not allowed to write .git/HEAD", false)]
    #[case(IoKind::StorageFull, "filesystem error on .git/HEAD: disk full", true)]
    fn test_from_io(#[case] kind: IoKind, #[case] message: &str, #[case] retryable: bool) {
        let err = ErrorKind::from_io(std::io::Error::new(kind, "disk full"), Path::new(".git/HEAD"));
        assert_eq!(err.to_string(), message);
        assert_eq!(err.is_retryable(), retryable);
    }
}
