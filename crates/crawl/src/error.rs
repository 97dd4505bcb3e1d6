//! Crawl Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! None of these ever escape a worker: every failure is scoped to one path,
//! logged where it happens, and the crawl carries on.

use derive_more::{Display, Error};

/// A crawl error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for crawl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a single path could not be turned into content.
///
/// ### Skips (the remote simply doesn't have it)
/// - [`ErrorKind::Status`]
/// - [`ErrorKind::HtmlResponse`]
/// - [`ErrorKind::EmptyResponse`]
///
/// ### Failures
/// - [`ErrorKind::Transport`]
/// - [`ErrorKind::CacheRead`]
/// - [`ErrorKind::Persist`]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote answered with something other than `200` or `429`.
    #[display("unexpected status {_0}")]
    Status(#[error(not(source))] u16),
    /// The request never completed.
    #[display("request failed")]
    Transport,
    /// `200 OK`, but the body is an HTML page rather than git metadata.
    #[display("response appears to be HTML")]
    HtmlResponse,
    /// `200 OK` with nothing in it.
    #[display("response appears to be empty")]
    EmptyResponse,
    /// The local copy exists but could not be read, or the path is not
    /// allowed in the local store at all.
    #[display("could not read local copy")]
    CacheRead,
    /// Creating parent directories or writing the file failed.
    #[display("could not persist response")]
    Persist,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Persist)
    }

    /// Returns `true` if the path is simply absent on the remote, which is
    /// the expected outcome for most guessed paths.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Status(_) | Self::HtmlResponse | Self::EmptyResponse)
    }
}
