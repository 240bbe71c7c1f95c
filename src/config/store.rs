//! Key/value config storage
//!
//! The settings panel only ever needs `get` and `set` on string values, so
//! the storage engine is hidden behind [`ConfigStore`].

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Config key of the custom marketmaker URL field.
pub const MARKETMAKER_URL_KEY: &str = "marketmakerUrl";

/// Config key holding the enabled currencies as a JSON array string.
pub const ENABLED_COINS_KEY: &str = "enabledCoins";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config store lock poisoned")]
    Poisoned,
}

/// Narrow contract to a persistent string key/value store.
///
/// Writes are synchronous from the caller's point of view. Retry and
/// durability policy belong to the implementation.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}


/// Config store backed by a pretty-printed JSON object on disk.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonConfigStore {
    /// `config.json` next to the executable, like the other portable data files.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("."))
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    /// Load the store from `path`. A missing file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let values: BTreeMap<String, String> = serde_json::from_str(&content)?;
            tracing::info!("Loaded {} config values from {:?}", values.len(), path);
            values
        } else {
            tracing::info!("No config file found at {:?}, starting fresh", path);
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>, StoreError> {
        self.values.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.lock()?;
        let previous = values.insert(key.to_string(), value.to_string());

        let written = serde_json::to_string_pretty(&*values)
            .map_err(StoreError::from)
            .and_then(|content| std::fs::write(&self.path, content).map_err(StoreError::from));

        if let Err(e) = written {
            // Keep memory in line with what is on disk
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(e);
        }

        tracing::debug!("Saved config key {} to {:?}", key, self.path);
        Ok(())
    }
}


/// In-memory store, counting writes.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
