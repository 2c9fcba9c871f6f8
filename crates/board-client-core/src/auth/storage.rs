//! Transient key/value storage backing the session.
//!
//! Models per-tab browser storage: values live as long as the "tab" does.
//! `MemoryStorage` lives for the process, `FileStorage` keeps a JSON map on
//! disk until it is cleared (the CLI uses it so a session spans invocations).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Key/value storage scoped to one tab's lifetime.
///
/// Storage is assumed to always be available, so none of these operations
/// report errors to the caller.
pub trait TabStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;

    fn set_item(&self, key: &str, value: &str);

    fn remove_item(&self, key: &str);

    /// Remove the value and return it, as one step.
    fn take_item(&self, key: &str) -> Option<String>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process storage, dropped with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        lock(&self.items).insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        lock(&self.items).remove(key);
    }

    fn take_item(&self, key: &str) -> Option<String> {
        lock(&self.items).remove(key)
    }
}

/// Storage persisted as a JSON object in a single file.
///
/// Every mutation is written through immediately. A missing or unreadable
/// file is treated as empty storage.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open storage at `path`, loading any existing contents
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match Self::read(&path) {
            Ok(items) => items,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session storage");
                HashMap::new()
            }
        };
        Self {
            path,
            items: Mutex::new(items),
        }
    }

    fn read(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let contents = std::fs::read_to_string(path).context("Failed to read session storage")?;
        serde_json::from_str(&contents).context("Failed to parse session storage")
    }

    fn write(&self, items: &HashMap<String, String>) -> Result<()> {
        if items.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn persist(&self, items: &HashMap<String, String>) {
        match self.write(items) {
            Ok(()) => debug!(path = %self.path.display(), "Session storage written"),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to write session storage")
            }
        }
    }
}

impl TabStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        let mut items = lock(&self.items);
        items.insert(key.to_string(), value.to_string());
        self.persist(&items);
    }

    fn remove_item(&self, key: &str) {
        let mut items = lock(&self.items);
        if items.remove(key).is_some() {
            self.persist(&items);
        }
    }

    fn take_item(&self, key: &str) -> Option<String> {
        let mut items = lock(&self.items);
        let value = items.remove(key);
        if value.is_some() {
            self.persist(&items);
        }
        value
    }
}
