//! At-most-once bookkeeping for paths.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Set of paths some worker has already taken responsibility for.
///
/// Append-only for the lifetime of a crawl: a path is never released, so it
/// is processed at most once no matter how many times it is rediscovered.
#[derive(Debug, Default)]
pub struct Registry {
    claimed: Mutex<HashSet<String>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path` for the caller.
    ///
    /// Returns `true` exactly once per distinct path, however many callers
    /// race for it; every other caller gets `false` and must back off.
    ///
    /// ```
    /// use spelunk_crawl::Registry;
    /// let registry = Registry::new();
    /// assert!(registry.claim(".git/HEAD"));
    /// assert!(!registry.claim(".git/HEAD"));
    /// ```
    pub fn claim(&self, path: &str) -> bool {
        // Nothing inside the critical section can panic half-way through an
        // update, so a poisoned lock still guards a consistent set.
        let mut claimed = self.claimed.lock().unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(path) {
            return false;
        }
        claimed.insert(path.to_string())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner).contains(path)
    }

    pub fn len(&self) -> usize {
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
