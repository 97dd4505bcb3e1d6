use crate::error::{ErrorKind, Result};
use crate::{Store, path::confine};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A mirror that lives in memory, for tests.
///
/// Counts saves, and can be made to refuse them, so tests can assert that a
/// response was (or wasn't) persisted.
///
/// ```
/// use spelunk_storage::{MemoryStore, Store};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::with_files([(".git/HEAD", "ref: refs/heads/main\n")]);
/// assert!(store.contains(Path::new(".git/HEAD")).await?);
/// store.save(Path::new(".git/refs/heads/main"), b"4b825dc\n").await?;
/// assert_eq!(store.saves(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    read_only: bool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Panics on a path [`confine`] refuses; that's a broken test.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let files = files
            .into_iter()
            .map(|(path, data)| {
                let path = path.into();
                match confine(&path) {
                    Ok(path) => (path, data.into()),
                    Err(_) => panic!("invalid path in test fixture: {}", path.display()),
                }
            })
            .collect();
        Self {
            files: RwLock::new(files),
            ..Self::default()
        }
    }

    /// Refuse every save with [`ReadOnly`](ErrorKind::ReadOnly).
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Successful saves so far.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let path = confine(path.as_ref()).ok()?;
        self.files.read().await.get(&path).cloned()
    }

    /// Every saved path, sorted.
    pub async fn paths(&self) -> Vec<PathBuf> {
        self.files.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn contains(&self, path: &Path) -> Result<bool> {
        let key = confine(path)?;
        Ok(self.files.read().await.contains_key(&key))
    }

    async fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let key = confine(path)?;
        let Some(data) = self.files.read().await.get(&key).cloned() else {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        };
        Ok(data)
    }

    async fn save(&self, path: &Path, data: &[u8]) -> Result<()> {
        let key = confine(path)?;
        if self.read_only {
            exn::bail!(ErrorKind::ReadOnly(path.to_path_buf()));
        }
        self.files.write().await.insert(key, data.to_vec());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
