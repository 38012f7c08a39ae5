//! Persistence layer.
//!
//! A small key/value store abstraction (JSON file on disk, or in-memory
//! for tests) and the favorites set built on top of it.

pub mod favorites;

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub use favorites::Favorites;

/// String values under string keys, like browser local storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// All keys in one pretty-printed JSON object on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File contents, or `None` when there is no file yet.
    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No store file found, starting fresh");
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .with_context(|| format!("Failed to read store {}", self.path.display()))
    }

    fn parse(&self, json: &str) -> Result<BTreeMap<String, String>> {
        serde_json::from_str(json).with_context(|| format!("Failed to parse store {}", self.path.display()))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        match self.read_raw()? {
            Some(json) => self.parse(&json),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Delete the backing file (for testing or reset).
    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete store file {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is overwritten rather than blocking writes; an
        // unreadable one is not.
        let mut all = match self.read_raw()? {
            Some(json) => self.parse(&json).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt store");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        all.insert(key.to_string(), value.to_string());

        let json = serde_json::to_string_pretty(&all).context("Failed to serialise store")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write store {}", self.path.display()))?;

        debug!(path = %self.path.display(), key, "Store saved");
        Ok(())
    }
}

/// In-memory store. Clones share the same map, so a clone can stand in
/// for "the same storage after a restart".
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
