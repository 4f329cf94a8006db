//! Opaque key-value storage for values that must survive app runs (the
//! per-installation client id). The store is deliberately dumb: string in,
//! string out, explicit flush.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::analytics::error::{internal_error, AnalyticsResult};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AnalyticsResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AnalyticsResult<()>;
    fn flush(&self) -> AnalyticsResult<()>;
}

/// File-backed store: one JSON object per store, loaded eagerly, written on
/// `flush`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> AnalyticsResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                internal_error(format!(
                    "Failed to create analytics settings directory '{}': {}",
                    parent.display(),
                    err
                ))
            })?;
        }

        let cache: BTreeMap<String, String> = if path.exists() {
            let bytes = fs::read(&path).map_err(|err| {
                internal_error(format!(
                    "Failed to read analytics settings '{}': {}",
                    path.display(),
                    err
                ))
            })?;
            serde_json::from_slice(&bytes).map_err(|err| {
                internal_error(format!(
                    "Failed to parse analytics settings '{}': {}",
                    path.display(),
                    err
                ))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            cache: Mutex::new(cache),
        })
    }

    /// Opens the store at its default location: `$ANALYTICS_SETTINGS_PATH`
    /// when set, otherwise `.analytics/settings.json` under the working
    /// directory.
    pub fn default_location() -> AnalyticsResult<Self> {
        if let Ok(path) = std::env::var("ANALYTICS_SETTINGS_PATH") {
            return Self::new(PathBuf::from(path));
        }

        let path = std::env::current_dir()
            .map_err(|err| internal_error(format!("Failed to obtain working directory: {}", err)))?
            .join(".analytics/settings.json");
        Self::new(path)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> AnalyticsResult<Option<String>> {
        Ok(self.cache.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AnalyticsResult<()> {
        self.cache
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn flush(&self) -> AnalyticsResult<()> {
        let snapshot = self.cache.lock().unwrap().clone();
        let bytes = serde_json::to_vec(&snapshot).map_err(|err| {
            internal_error(format!(
                "Failed to serialize analytics settings '{}': {}",
                self.path.display(),
                err
            ))
        })?;
        fs::write(&self.path, bytes).map_err(|err| {
            internal_error(format!(
                "Failed to write analytics settings '{}': {}",
                self.path.display(),
                err
            ))
        })
    }
}

/// In-memory store for tests and hosts that manage persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AnalyticsResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AnalyticsResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn flush(&self) -> AnalyticsResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path() -> PathBuf {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        std::env::temp_dir().join(format!(
            "analytics-store-{}-{}/settings.json",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn file_store_round_trip() {
        let path = temp_store_path();
        let store = FileStore::new(path.clone()).unwrap();
        store.set("client_id", "abc123").unwrap();
        store.flush().unwrap();

        let reopened = FileStore::new(path.clone()).unwrap();
        assert_eq!(reopened.get("client_id").unwrap().as_deref(), Some("abc123"));
        assert_eq!(reopened.get("missing").unwrap(), None);
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn unflushed_writes_stay_in_memory() {
        let path = temp_store_path();
        let store = FileStore::new(path.clone()).unwrap();
        store.set("client_id", "abc123").unwrap();

        let reopened = FileStore::new(path.clone()).unwrap();
        assert_eq!(reopened.get("client_id").unwrap(), None);
        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        store.flush().unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
