//! Recursive discovery of refs and reflogs in a `.git` directory exposed over
//! HTTP.
//!
//! Starting from a handful of well-known paths ([`ref_seeds`]), every file
//! retrieved is scanned for pointers to more files, which are queued in turn
//! until nothing new turns up. Retrieved files are mirrored into a
//! [`Store`](spelunk_storage::Store), and a file already
//! present there is never requested again, so an interrupted crawl can simply
//! be started again.
//!
//! ```no_run
//! use futures::StreamExt;
//! use spelunk_crawl::{Context, CrawlEvent, RateLimiter, crawl, ref_seeds};
//! use spelunk_remote::{HttpOptions, HttpRemote};
//! use spelunk_storage::DirStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let remote = HttpRemote::new("https://example.com/.git/", &HttpOptions::default())?;
//! let store = DirStore::new("/tmp/example.com")?;
//! let ctx = Context::new(Arc::new(remote), Arc::new(store), RateLimiter::default());
//!
//! let mut events = std::pin::pin!(crawl(&ctx, ref_seeds(), 32));
//! while let Some(event) = events.next().await {
//!     if let CrawlEvent::Complete(summary) = event {
//!         println!("{} files retrieved", summary.stored());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod context;
pub mod error;
mod job;
mod ratelimit;
mod registry;
mod resolve;
mod seeds;
#[cfg(test)]
mod testing;
mod tracker;
mod worker;

pub use crate::context::Context;
pub use crate::job::{Job, JobSink};
pub use crate::ratelimit::RateLimiter;
pub use crate::registry::Registry;
pub use crate::resolve::{CONFIG_PATHS, Content, RESERVED_SUFFIX, is_config, resolve, storage_path};
pub use crate::seeds::{REF_SEEDS, ref_seeds};
pub use crate::tracker::{CrawlEvent, DEFAULT_CONCURRENCY, JobQueue, Summary, crawl};
pub use crate::worker::{Visit, find_refs};
