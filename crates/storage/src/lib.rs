//! Local mirror of a remote `.git` directory.
//!
//! Whatever the crawler retrieves is saved here under its relative path, and
//! anything already saved is treated as authoritative: it is loaded instead of
//! being requested again.

mod dir;
pub mod error;
#[cfg(feature = "mock")]
mod memory;
mod path;

pub use crate::dir::DirStore;
#[cfg(feature = "mock")]
pub use crate::memory::MemoryStore;
pub use crate::path::confine as confine_path;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

pub type StoreHandle = Arc<dyn Store + Send + Sync>;

/// Where retrieved files are kept.
///
/// Paths are relative to the mirror root and pass through
/// [`confine_path`] first; a path that would leave the root is an
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) error for every
/// operation.
///
/// ```
/// use spelunk_storage::{Store, error::Result};
/// use std::path::Path;
///
/// async fn mirrored_head(store: &dyn Store) -> Result<Option<Vec<u8>>> {
///     let head = Path::new(".git/HEAD");
///     match store.contains(head).await? {
///         true => Ok(Some(store.load(head).await?)),
///         false => Ok(None),
///     }
/// }
/// ```
#[async_trait]
pub trait Store: Send + Sync {
    async fn contains(&self, path: &Path) -> Result<bool>;

    /// Fails with [`NotFound`](crate::error::ErrorKind::NotFound) if nothing
    /// was saved at `path`.
    async fn load(&self, path: &Path) -> Result<Vec<u8>>;

    /// Saves `data` at `path`, replacing anything already there. Missing
    /// parent directories are created.
    async fn save(&self, path: &Path, data: &[u8]) -> Result<()>;
}
