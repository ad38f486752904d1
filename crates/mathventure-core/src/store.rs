//! Durable backup store.
//!
//! A small global key-value store used as a crash-recovery cache for the
//! learner's name, quiz answers and weak-spot log. Values are strings
//! (JSON text for structured values) and every write overwrites the whole
//! value. The in-memory state of the evaluator stays authoritative; the store
//! is only read back once, at construction.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Key holding the learner's display name.
pub const LEARNER_NAME_KEY: &str = "learner_name";
/// Key holding the deduplicated weak-spot list.
pub const WEAK_SPOTS_KEY: &str = "weak_spots";

/// A process-wide handle to the backup store.
pub type SharedStore = Arc<dyn BackupStore>;

/// Whole-value key-value storage. Last writer wins.
pub trait BackupStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl BackupStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object file.
///
/// The file is read lazily on first access and rewritten on every change.
/// A missing file is an empty store; a corrupt one is logged and treated as
/// empty so the session can continue.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn shared(path: impl Into<PathBuf>) -> SharedStore {
        Arc::new(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!("cannot read store {}: {e}", self.path.display());
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    "discarding corrupt store {}: {e}",
                    self.path.display()
                );
                BTreeMap::new()
            }
        }
    }

    fn write(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn with_values<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> Result<T, StoreError> {
        let mut cache = self.cache.lock().map_err(|_| StoreError::Poisoned)?;
        let values = cache.get_or_insert_with(|| self.load());
        Ok(f(values))
    }
}

impl BackupStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_values(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let snapshot = self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
            values.clone()
        })?;
        self.write(&snapshot)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let snapshot = self.with_values(|values| values.remove(key).map(|_| values.clone()))?;
        match snapshot {
            Some(values) => self.write(&values),
            None => Ok(()),
        }
    }
}

/// Read access to the learner's display name.
pub struct LearnerProfile {
    store: SharedStore,
}

impl LearnerProfile {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The stored name, if any. Store failures read as "no name".
    pub fn name(&self) -> Option<String> {
        match self.store.get(LEARNER_NAME_KEY) {
            Ok(name) => name.filter(|n| !n.trim().is_empty()),
            Err(e) => {
                tracing::warn!("cannot read learner name: {e}");
                None
            }
        }
    }

    /// The stored name or a friendly fallback.
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| "superstar".to_string())
    }

    pub fn set_name(&self, name: &str) -> Result<(), StoreError> {
        self.store.set(LEARNER_NAME_KEY, name)
    }
}
