//! Startup Error Types
//!
//! Only failures that stop a crawl from starting end up here; everything that
//! goes wrong during a crawl is logged and counted instead.

use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("invalid repository URL: {_0}")]
    Url(#[error(not(source))] String),
    /// Either the URL or the HTTP client options are unusable.
    #[display("could not set up remote {_0}")]
    Remote(#[error(not(source))] String),
    #[display("unusable output directory: {}", _0.display())]
    OutputDir(#[error(not(source))] PathBuf),
}
