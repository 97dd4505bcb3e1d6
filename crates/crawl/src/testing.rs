//! Shared fixtures for unit tests.

use crate::job::{Job, JobSink};
use crate::{Context, RateLimiter};
use spelunk_remote::MockRemote;
use spelunk_storage::MemoryStore;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Sink that only remembers what it was given.
#[derive(Default)]
pub(crate) struct RecordingSink {
    jobs: Mutex<Vec<Job>>,
}
impl RecordingSink {
    pub(crate) fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.jobs().iter().map(|job| job.path().to_string()).collect()
    }
}
impl JobSink for RecordingSink {
    fn add_job(&self, job: Job) {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).push(job);
    }
}

pub(crate) fn fast_limiter() -> RateLimiter {
    RateLimiter::new(Duration::from_millis(1), Duration::from_millis(10))
}

/// A context over in-memory collaborators, plus typed handles to inspect them.
pub(crate) fn context(remote: MockRemote, store: MemoryStore) -> (Context, Arc<MockRemote>, Arc<MemoryStore>) {
    let remote = Arc::new(remote);
    let store = Arc::new(store);
    let ctx = Context::new(remote.clone(), store.clone(), fast_limiter());
    (ctx, remote, store)
}
