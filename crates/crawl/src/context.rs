use crate::ratelimit::RateLimiter;
use crate::registry::Registry;
use spelunk_remote::RemoteHandle;
use spelunk_storage::StoreHandle;
use std::sync::Arc;

/// Everything a worker needs, shared by every worker of one crawl.
///
/// Cloning is cheap and shares the registry and throttle flag, so two clones
/// belong to the same crawl. Build a new one for an independent crawl.
#[derive(Clone)]
pub struct Context {
    /// The exposed repository (HTTP client plus base URL).
    pub remote: RemoteHandle,
    /// Local mirror (base directory).
    pub store: StoreHandle,
    pub registry: Arc<Registry>,
    pub limiter: RateLimiter,
}

impl Context {
    pub fn new(remote: RemoteHandle, store: StoreHandle, limiter: RateLimiter) -> Self {
        Self {
            remote,
            store,
            registry: Arc::new(Registry::new()),
            limiter,
        }
    }
}
