//! The per-path worker.

use crate::Context;
use crate::error::ErrorKind;
use crate::job::{Job, JobSink};
use crate::resolve::{Content, is_config, resolve};
use spelunk_extract::{discover_branches, discover_config, discover_refs};
use tracing::instrument;

/// How one invocation of [`find_refs`] ended. Informational only; nothing
/// about the crawl depends on it beyond progress reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Another job got to this path first; nothing was done.
    AlreadyClaimed,
    /// Read from the local store and parsed.
    Cached { discovered: usize },
    /// Downloaded, persisted and parsed.
    Fetched { discovered: usize },
    /// The remote is throttling; the path was queued again.
    RateLimited,
    /// Skipped or failed; the reason has been logged.
    Failed,
}

/// Processes one path: obtain its content (local copy first, remote
/// otherwise), then queue every path its content points at.
///
/// Runs straight through and never propagates an error: anything that goes
/// wrong only affects this path and is logged here. A `429` raises the shared
/// throttle flag and queues the same path again as a [`Job::retry`], which
/// skips the deduplication check this job already passed.
#[instrument(skip_all, fields(path = job.path(), retry = job.is_retry()))]
pub async fn find_refs(job: Job, ctx: &Context, jobs: &dyn JobSink) -> Visit {
    ctx.limiter.wait().await;

    let path = job.path();
    if !job.is_retry() && !ctx.registry.claim(path) {
        tracing::trace!("already claimed");
        return Visit::AlreadyClaimed;
    }

    let (content, cached) = match resolve(path, ctx).await {
        Ok(Content::Cached(content)) => (content, true),
        Ok(Content::Fetched(content)) => {
            tracing::info!(uri = %ctx.remote.url(path), "fetched ref");
            (content, false)
        },
        Ok(Content::RateLimited) => {
            ctx.limiter.set_limited();
            jobs.add_job(Job::retry(path));
            return Visit::RateLimited;
        },
        Err(err) if err.is_skip() => {
            let reason: &ErrorKind = &err;
            tracing::warn!(uri = %ctx.remote.url(path), %reason, "failed to fetch ref");
            return Visit::Failed;
        },
        Err(err) => {
            tracing::error!(uri = %ctx.remote.url(path), error = ?err, "failed to fetch ref");
            return Visit::Failed;
        },
    };

    let discovered = discover(path, &content, jobs);
    match cached {
        true => Visit::Cached { discovered },
        false => Visit::Fetched { discovered },
    }
}

/// Queues everything `content` points at and returns how many jobs that was.
fn discover(path: &str, content: &[u8], jobs: &dyn JobSink) -> usize {
    let mut discovered = 0;
    let mut emit = |found: Vec<String>| {
        discovered += found.len();
        found.into_iter().for_each(|path| jobs.add_job(Job::new(path)));
    };

    emit(discover_refs(content));
    // Branch declarations only really appear in FETCH_HEAD, but scanning
    // everything is cheap and occasionally finds them elsewhere.
    emit(discover_branches(content));
    if is_config(path) {
        match discover_config(content) {
            Ok(found) => emit(found),
            Err(err) => tracing::error!(error = ?err, "failed to parse git config"),
        }
    }
    discovered
}
