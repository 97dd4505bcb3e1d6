use crate::Context;
use crate::job::{Job, JobSink};
use crate::worker::{Visit, find_refs};
use async_stream::stream;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Workers in flight when nothing else is configured.
pub const DEFAULT_CONCURRENCY: usize = 32;

/// Progress events emitted by [`crawl`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started), exactly once.
/// 2. [`Visited`](Self::Visited), once per job taken off the queue.
/// 3. [`Complete`](Self::Complete), exactly once, when the queue is empty and
///    no worker is left running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    Started,
    Visited { path: String, visit: Visit },
    Complete(Summary),
}

/// Running totals of a crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub fetched: usize,
    pub cached: usize,
    pub failed: usize,
    pub rate_limited: usize,
    /// Jobs dropped because the path had already been claimed.
    pub duplicates: usize,
    /// Jobs emitted by workers (seeds excluded).
    pub discovered: usize,
}

impl Summary {
    pub fn record(&mut self, visit: Visit) {
        match visit {
            Visit::AlreadyClaimed => self.duplicates += 1,
            Visit::Cached { discovered } => {
                self.cached += 1;
                self.discovered += discovered;
            },
            Visit::Fetched { discovered } => {
                self.fetched += 1;
                self.discovered += discovered;
            },
            Visit::RateLimited => self.rate_limited += 1,
            Visit::Failed => self.failed += 1,
        }
    }

    /// Paths that ended up in the local store, one way or another.
    pub fn stored(&self) -> usize {
        self.fetched + self.cached
    }
}

/// The scheduler's end of the job queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    sender: UnboundedSender<Job>,
}

impl JobQueue {
    /// A queue plus the receiving end the tracker drains.
    pub fn channel() -> (Self, UnboundedReceiver<Job>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl JobSink for JobQueue {
    fn add_job(&self, job: Job) {
        if let Err(err) = self.sender.send(job) {
            tracing::debug!(path = err.0.path(), "crawl already finished; dropping job");
        }
    }
}

/// Streams [`CrawlEvent`]s while crawling outward from `seeds`.
///
/// Jobs are processed concurrently, up to `concurrency` at a time (at least
/// one). Every path a worker discovers is queued and processed in turn, until
/// a fixed point is reached: the queue is empty and nothing is in flight. The
/// order paths are visited in is unspecified.
///
/// Per-path failures never end the stream; they are reported as
/// [`Visit::Failed`] and counted in the final [`Summary`].
pub fn crawl<'a>(
    ctx: &'a Context,
    seeds: impl IntoIterator<Item = Job> + 'a,
    concurrency: usize,
) -> impl Stream<Item = CrawlEvent> + 'a {
    let concurrency = concurrency.max(1);
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield CrawlEvent::Started;

        let (queue, mut pending) = JobQueue::channel();
        seeds.into_iter().for_each(|job| queue.add_job(job));

        let mut summary = Summary::default();
        let mut processing = FuturesUnordered::new();
        loop {
            while processing.len() < concurrency {
                match pending.try_recv() {
                    Ok(job) => processing.push(run_job(job, ctx, &queue)),
                    Err(_) => break,
                }
            }
            // Workers only queue jobs before they finish, so with nothing in
            // flight and nothing pending there is nothing left to discover.
            let Some((path, visit)) = processing.next().await else {
                break;
            };
            summary.record(visit);
            yield CrawlEvent::Visited { path, visit };
        }

        tracing::debug!(?summary, "fixed point reached");
        yield CrawlEvent::Complete(summary);
    })
}

async fn run_job(job: Job, ctx: &Context, queue: &JobQueue) -> (String, Visit) {
    let path = job.path().to_string();
    let visit = find_refs(job, ctx, queue).await;
    (path, visit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ref_seeds;
    use crate::testing::{context, fast_limiter};
    use rstest::rstest;
    use spelunk_remote::{MockRemote, MockReply, Response};
    use spelunk_storage::MemoryStore;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn repository() -> MockRemote {
        MockRemote::default()
            .with_file(".git/HEAD", "ref: refs/heads/main\n")
            .with_file(".git/refs/heads/main", "0000000000000000000000000000000000000001\n")
            .with_file(
                ".git/logs/refs/heads/main",
                "0000000000000000000000000000000000000000 0000000000000000000000000000000000000001 \
                 Dev <dev@example.com> 1700000000 +0000\tcommit (initial): init\n",
            )
            .with_file(".git/packed-refs", "0000000000000000000000000000000000000001 refs/heads/main\n")
            .with_file(".git/config", "[branch \"feature\"]\n\tremote = upstream\n")
            .with_replies(
                ".git/refs/remotes/upstream/feature",
                [
                    MockReply::Respond(Response::new(429, "")),
                    MockReply::Respond(Response::new(200, "0000000000000000000000000000000000000002\n")),
                ],
            )
            .with_file(".git/logs/HEAD", "<!DOCTYPE html><html></html>")
    }

    fn expected_store() -> Vec<PathBuf> {
        let mut paths: Vec<_> = [
            ".git/HEAD",
            ".git/config.spelunk",
            ".git/logs/refs/heads/main",
            ".git/packed-refs",
            ".git/refs/heads/main",
            ".git/refs/remotes/upstream/feature",
        ]
        .into_iter()
        .map(PathBuf::from)
        .collect();
        paths.sort();
        paths
    }

    async fn run(ctx: &Context, concurrency: usize) -> Vec<CrawlEvent> {
        crawl(ctx, ref_seeds(), concurrency).collect().await
    }

    fn summary(events: &[CrawlEvent]) -> Summary {
        match events.last() {
            Some(CrawlEvent::Complete(summary)) => *summary,
            other => panic!("crawl did not complete: {other:?}"),
        }
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(DEFAULT_CONCURRENCY)]
    #[tokio::test]
    async fn test_reaches_fixed_point(#[case] concurrency: usize) {
        let (ctx, remote, store) = context(repository(), MemoryStore::default());
        let events = run(&ctx, concurrency).await;

        assert_eq!(events.first(), Some(&CrawlEvent::Started));
        assert_eq!(store.paths().await, expected_store());
        let summary = summary(&events);
        assert_eq!(summary.fetched, 6);
        assert_eq!(summary.cached, 0);
        assert_eq!(summary.rate_limited, 1);
        assert_eq!(events.len(), summary.fetched + summary.failed + summary.rate_limited + summary.duplicates + 2);

        // Discovered from HEAD, packed-refs and the seeds, fetched once.
        assert_eq!(remote.request_count(".git/refs/heads/main"), 1);
        assert_eq!(remote.request_count(".git/refs/remotes/upstream/feature"), 2);
        // Branch sections also read as branch declarations for `origin`.
        assert_eq!(remote.request_count(".git/refs/remotes/origin/feature"), 1);
        assert!(!ctx.limiter.is_limited());
    }

    #[tokio::test]
    async fn test_every_path_is_visited_once() {
        let (ctx, remote, _) = context(repository(), MemoryStore::default());
        let events = run(&ctx, 8).await;
        let mut requested = remote.requests();
        requested.sort();
        let total = requested.len();
        requested.dedup();
        // Only the rate-limited path was asked for twice.
        assert_eq!(total, requested.len() + 1);
        let claimed: usize = events
            .iter()
            .filter(|event| matches!(event, CrawlEvent::Visited { visit, .. } if *visit != Visit::AlreadyClaimed))
            .count();
        assert_eq!(claimed, total);
        assert_eq!(ctx.registry.len(), requested.len());
    }

    #[tokio::test]
    async fn test_second_crawl_is_served_locally() {
        let (first, _, store) = context(repository(), MemoryStore::default());
        let events = run(&first, 4).await;
        let fresh = summary(&events);

        let remote = Arc::new(MockRemote::default());
        let second = Context::new(remote.clone(), store.clone(), fast_limiter());
        let events = run(&second, 4).await;
        let again = summary(&events);

        assert_eq!(again.cached, fresh.fetched);
        assert_eq!(again.fetched, 0);
        assert_eq!(again.discovered, fresh.discovered);
        for path in [".git/HEAD", ".git/config", ".git/refs/heads/main", ".git/refs/remotes/upstream/feature"] {
            assert_eq!(remote.request_count(path), 0, "{path} was refetched");
        }
        assert_eq!(store.paths().await, expected_store());
    }

    #[tokio::test]
    async fn test_empty_remote_completes() {
        let (ctx, _, store) = context(MockRemote::default(), MemoryStore::default());
        let events = run(&ctx, 4).await;
        let summary = summary(&events);
        assert_eq!(summary.failed, ref_seeds().count());
        assert_eq!(summary.stored(), 0);
        assert!(store.paths().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_seeds() {
        let (ctx, remote, _) = context(repository(), MemoryStore::default());
        let events: Vec<_> = crawl(&ctx, Vec::new(), 0).collect().await;
        assert_eq!(events, [CrawlEvent::Started, CrawlEvent::Complete(Summary::default())]);
        assert!(remote.requests().is_empty());
    }

    #[test]
    fn test_summary_record() {
        let mut summary = Summary::default();
        summary.record(Visit::Fetched { discovered: 2 });
        summary.record(Visit::Cached { discovered: 3 });
        summary.record(Visit::AlreadyClaimed);
        summary.record(Visit::RateLimited);
        summary.record(Visit::Failed);
        assert_eq!(
            summary,
            Summary {
                fetched: 1,
                cached: 1,
                failed: 1,
                rate_limited: 1,
                duplicates: 1,
                discovered: 5,
            }
        );
        assert_eq!(summary.stored(), 2);
    }
}
