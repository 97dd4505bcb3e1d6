//! Units of work and how they enter the queue.

/// One path waiting to be processed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Job {
    path: String,
    retry: bool,
}

impl Job {
    /// A freshly discovered (or seeded) path. Subject to deduplication.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), retry: false }
    }

    /// A path re-queued by the worker that already claimed it, after the
    /// remote answered `429`. Skips deduplication, since the claim is already
    /// held by this very job.
    pub fn retry(path: impl Into<String>) -> Self {
        Self { path: path.into(), retry: true }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_retry(&self) -> bool {
        self.retry
    }
}

/// Where discovered work goes. The only way anything enters a crawl.
pub trait JobSink: Send + Sync {
    fn add_job(&self, job: Job);
}

