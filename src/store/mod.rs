//! Persistence boundary for received bouquets.
//!
//! The last link opened is kept under [`RECEIVED_BOUQUET_KEY`] so it can be
//! shown again later. Storage is best effort: the helpers log failures and
//! carry on, since losing the cached link never blocks viewing it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::StoreConfig;
use crate::error::{BouquetError, Result};

/// Key under which the most recently received link is stored
pub const RECEIVED_BOUQUET_KEY: &str = "received_bouquet";

/// String key-value store.
///
/// Implementations must be shareable across threads.
pub trait BouquetStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Fetch the value under `key`, `None` if absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Get the store name for logging.
    fn name(&self) -> &'static str;
}

/// Remember a received link.
///
/// Empty strings (the failed-encode sentinel) are not stored. Store errors
/// are logged and swallowed.
pub fn save_received_bouquet(store: &dyn BouquetStore, encoded: &str) {
    if encoded.is_empty() {
        return;
    }
    if let Err(e) = store.save(RECEIVED_BOUQUET_KEY, encoded) {
        tracing::error!("Failed to save received bouquet to {}: {}", store.name(), e);
    }
}

/// Last received link, if any. Store errors are logged and read as `None`.
pub fn stored_received_bouquet(store: &dyn BouquetStore) -> Option<String> {
    match store.load(RECEIVED_BOUQUET_KEY) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Failed to read received bouquet from {}: {}", store.name(), e);
            None
        },
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl BouquetStore for MemoryStore {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| BouquetError::Storage(format!("Lock poisoned: {e}")))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| BouquetError::Storage(format!("Lock poisoned: {e}")))?;
        Ok(entries.get(key).cloned())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// One file per key in a directory.
///
/// Keys are restricted to `[A-Za-z0-9_-]` so they map to plain file names.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store under `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the configured (or platform default) directory
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config
            .resolved_dir()
            .map(Self::new)
            .ok_or_else(|| BouquetError::Storage("No data directory available".to_string()))
    }

    /// Backing directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if !valid {
            return Err(BouquetError::Storage(format!("Invalid key: {key:?}")));
        }
        Ok(self.dir.join(key))
    }
}

impl BouquetStore for FileStore {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        // rename is atomic within a directory
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!("Saved {} ({} bytes) to {}", key, value.len(), path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
