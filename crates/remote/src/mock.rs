//! In-memory remote for testing.

use crate::error::{ErrorKind, Result};
use crate::{RemoteSource, Response};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};

/// One scripted answer of a [`MockRemote`].
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(Response),
    /// Fail the request as if the connection dropped.
    Transport,
}

/// In-memory remote for testing.
///
/// Each path has a queue of scripted replies; every request pops one, and the
/// last reply repeats forever. Unknown paths answer `404`. Every request is
/// recorded so tests can assert on what was (or wasn't) fetched.
///
/// # Examples
///
/// ```
/// use spelunk_remote::{MockRemote, RemoteSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let remote = MockRemote::default()
///     .with_file(".git/HEAD", "ref: refs/heads/main\n")
///     .with_status(".git/FETCH_HEAD", 429);
/// assert!(remote.get(".git/HEAD").await?.is_ok());
/// assert!(remote.get(".git/FETCH_HEAD").await?.is_rate_limited());
/// assert_eq!(remote.get(".git/ORIG_HEAD").await?.status, 404);
/// assert_eq!(remote.requests().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MockRemote {
    routes: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<String>>,
}

impl MockRemote {
    /// Serve `body` with status `200`.
    pub fn with_file(self, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.with_replies(path, [MockReply::Respond(Response::new(200, body))])
    }

    /// Serve an empty body with the given status.
    pub fn with_status(self, path: impl Into<String>, status: u16) -> Self {
        self.with_replies(path, [MockReply::Respond(Response::new(status, Vec::new()))])
    }

    /// Fail every request for `path` at the transport level.
    pub fn with_transport_error(self, path: impl Into<String>) -> Self {
        self.with_replies(path, [MockReply::Transport])
    }

    /// Script a sequence of replies for `path`. The last one repeats.
    pub fn with_replies(self, path: impl Into<String>, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner).insert(path.into(), replies.into_iter().collect());
        self
    }

    /// Every requested path, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of requests made for one path.
    pub fn request_count(&self, path: &str) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).iter().filter(|p| *p == path).count()
    }
}

#[async_trait]
impl RemoteSource for MockRemote {
    fn url(&self, path: &str) -> String {
        format!("mock://remote/{}", path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<Response> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_string());
        let reply = {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            match routes.get_mut(path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };
        match reply {
            Some(MockReply::Respond(response)) => Ok(response),
            Some(MockReply::Transport) => exn::bail!(ErrorKind::Transport(format!("connection reset: {path}"))),
            None => Ok(Response::new(404, "Not Found")),
        }
    }
}
