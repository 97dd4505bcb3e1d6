use crate::error::{ErrorKind, Result};
use crate::{Store, path::confine};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Suffix of the scratch file a save goes through before being renamed into
/// place. A crawl killed mid-save leaves one of these behind rather than a
/// truncated file that later runs would take for the real thing.
const PARTIAL_SUFFIX: &str = "spelunk-partial";

/// A mirror rooted at a directory on the local filesystem.
///
/// ```no_run
/// use spelunk_storage::DirStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = DirStore::new("/srv/loot/example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Opens (creating it if needed) the mirror at `root`, which must be
    /// absolute.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        match root.is_dir() {
            true => {},
            false if root.exists() => exn::bail!(ErrorKind::InvalidPath(root)),
            // Only happens once at startup; not worth making the constructor async.
            false => std::fs::create_dir_all(&root).map_err(|e| ErrorKind::from_io(e, &root))?,
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.root.join(confine(path)?))
    }
}

#[async_trait]
impl Store for DirStore {
    async fn contains(&self, path: &Path) -> Result<bool> {
        let file = self.locate(path)?;
        Ok(fs::try_exists(&file).await.map_err(|e| ErrorKind::from_io(e, path))?)
    }

    async fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let file = self.locate(path)?;
        Ok(fs::read(&file).await.map_err(|e| ErrorKind::from_io(e, path))?)
    }

    async fn save(&self, path: &Path, data: &[u8]) -> Result<()> {
        let file = self.locate(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ErrorKind::from_io(e, path))?;
        }
        let mut partial = file.clone().into_os_string();
        partial.push(".");
        partial.push(PARTIAL_SUFFIX);
        fs::write(&partial, data).await.map_err(|e| ErrorKind::from_io(e, path))?;
        fs::rename(&partial, &file).await.map_err(|e| ErrorKind::from_io(e, path))?;
        tracing::trace!(file = %file.display(), size = data.len(), "saved");
        Ok(())
    }
}
