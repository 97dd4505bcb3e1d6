//! Local copy or remote fetch, for one path.

use crate::Context;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use spelunk_extract::{is_empty, is_html};
use std::path::PathBuf;
use tracing::instrument;

/// Config files whose branch sections point at remote-tracking refs.
pub const CONFIG_PATHS: [&str; 2] = [".git/config", ".git/config.worktree"];
/// Appended to config files in the local store, so that the mirror doesn't
/// accidentally become a repository with the remote's settings (hooks paths,
/// `core.fsmonitor`, ...) should anyone run git inside it.
pub const RESERVED_SUFFIX: &str = "spelunk";

pub fn is_config(path: &str) -> bool {
    CONFIG_PATHS.contains(&path)
}

/// Where `path` lives in the local store.
///
/// ```
/// use spelunk_crawl::storage_path;
/// use std::path::Path;
/// assert_eq!(storage_path(".git/HEAD"), Path::new(".git/HEAD"));
/// assert_eq!(storage_path(".git/config"), Path::new(".git/config.spelunk"));
/// ```
pub fn storage_path(path: &str) -> PathBuf {
    match is_config(path) {
        true => PathBuf::from(format!("{path}.{RESERVED_SUFFIX}")),
        false => PathBuf::from(path),
    }
}

/// What [`resolve`] found for a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// A local copy already existed; the remote was not contacted.
    Cached(Vec<u8>),
    /// Downloaded and persisted just now.
    Fetched(Vec<u8>),
    /// The remote answered `429`; nothing was persisted.
    RateLimited,
}

/// Returns the content of `path`, from the local store if it's there, or from
/// the remote otherwise (in which case it is persisted before returning).
///
/// A local copy is authoritative: once a path has been written, it is never
/// fetched again.
///
/// # Errors
///
/// See [`ErrorKind`] for what can go wrong. Nothing is written to the store
/// unless `Ok(Content::Fetched(_))` is returned.
#[instrument(level = "debug", skip(ctx), fields(file))]
pub async fn resolve(path: &str, ctx: &Context) -> Result<Content> {
    let file = storage_path(path);
    tracing::Span::current().record("file", tracing::field::display(file.display()));

    // A path the store refuses (escaping the root, for instance) counts as
    // unreadable; it is never worth a request.
    if ctx.store.contains(&file).await.or_raise(|| ErrorKind::CacheRead)? {
        tracing::info!(file = %file.display(), "already fetched, skipping redownload");
        let bytes = ctx.store.load(&file).await.or_raise(|| ErrorKind::CacheRead)?;
        return Ok(Content::Cached(bytes));
    }

    let response = ctx.remote.get(path).await.or_raise(|| ErrorKind::Transport)?;
    if response.is_rate_limited() {
        return Ok(Content::RateLimited);
    }
    if !response.is_ok() {
        exn::bail!(ErrorKind::Status(response.status));
    }
    if is_html(&response.body) {
        exn::bail!(ErrorKind::HtmlResponse);
    }
    if is_empty(&response.body) {
        exn::bail!(ErrorKind::EmptyResponse);
    }
    ctx.store.save(&file, &response.body).await.or_raise(|| ErrorKind::Persist)?;
    Ok(Content::Fetched(response.body))
}
