//! Read access to a `.git` directory exposed over HTTP.
//!
//! The crawler only ever needs one operation: `GET` a path relative to the
//! exposed directory and look at the status and body. [`RemoteSource`] is that
//! operation; [`HttpRemote`] is the real implementation and `MockRemote`
//! (behind the `mock` feature) is an in-memory one for tests.

pub mod error;
mod http;
#[cfg(feature = "mock")]
mod mock;

pub use crate::http::{HttpOptions, HttpRemote, normalize_base_url};
#[cfg(feature = "mock")]
pub use crate::mock::{MockRemote, MockReply};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type RemoteHandle = Arc<dyn RemoteSource + Send + Sync>;

/// Status code the crawler treats as a request to back off.
pub const STATUS_TOO_MANY_REQUESTS: u16 = 429;
pub const STATUS_OK: u16 = 200;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}
impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == STATUS_TOO_MANY_REQUESTS
    }
}

/// Something that can serve files relative to an exposed `.git` root.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Full URL a relative path resolves to. Used for requests and logging.
    fn url(&self, path: &str) -> String;

    /// `GET` a path relative to the remote root.
    ///
    /// Any status code, including 4xx/5xx, is returned as a [`Response`];
    /// only transport-level failures are errors.
    async fn get(&self, path: &str) -> Result<Response>;
}
