// src/db/kv_store.rs
// DOCUMENTATION: Durable string-keyed blob storage
// PURPOSE: Plain JSON text entries, one per key, no versioning

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::{collections::HashMap, sync::Mutex};

/// Synchronous key-value storage for whole JSON documents
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, `None` if it was never written
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Replace the value for `key` with `value`
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Directory-backed store: each key lives in `<dir>/<key>.json`
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if missing) the data directory
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Blocking file I/O; async callers run it through `web::block`
    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // Write-then-rename so a crash never leaves a half-written blob
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        // A fresh mutex cannot be poisoned
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory store poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
