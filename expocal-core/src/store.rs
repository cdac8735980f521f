//! Durable key-value storage behind the cache and credential.
//!
//! Multi-key updates go through `Store::apply`, which either lands every
//! operation or none. `Store::get_many` reads several keys from one view of
//! the store, so the event batch and its timestamp can never be observed
//! apart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{ExpoError, ExpoResult};

const STORE_FILE: &str = "store.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Put { key: String, value: String },
    Delete { key: String },
}

impl StoreOp {
    pub fn put(key: &str, value: impl Into<String>) -> Self {
        StoreOp::Put {
            key: key.to_string(),
            value: value.into(),
        }
    }

    pub fn delete(key: &str) -> Self {
        StoreOp::Delete {
            key: key.to_string(),
        }
    }

    fn apply_to(&self, map: &mut BTreeMap<String, String>) {
        match self {
            StoreOp::Put { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            StoreOp::Delete { key } => {
                map.remove(key);
            }
        }
    }
}

pub trait Store: Send + Sync {
    /// Read all `keys` from the same state, in order.
    fn get_many(&self, keys: &[&str]) -> ExpoResult<Vec<Option<String>>>;

    fn get(&self, key: &str) -> ExpoResult<Option<String>> {
        Ok(self.get_many(&[key])?.pop().flatten())
    }

    /// Apply all operations atomically.
    fn apply(&self, ops: &[StoreOp]) -> ExpoResult<()>;

    fn set(&self, key: &str, value: &str) -> ExpoResult<()> {
        self.apply(&[StoreOp::put(key, value)])
    }

    fn remove(&self, key: &str) -> ExpoResult<()> {
        self.apply(&[StoreOp::delete(key)])
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Store for MemoryStore {
    fn get_many(&self, keys: &[&str]) -> ExpoResult<Vec<Option<String>>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(keys.iter().map(|key| values.get(*key).cloned()).collect())
    }

    fn apply(&self, ops: &[StoreOp]) -> ExpoResult<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        for op in ops {
            op.apply_to(&mut values);
        }
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten through a temp file + rename.
///
/// A file that does not parse is treated as empty and replaced on the next
/// write, so a damaged store never locks the user out.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store living at `<dir>/store.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::at(dir.join(STORE_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        FileStore {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ExpoResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        match serde_json::from_str(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(path = %self.path.display(), "Ignoring unreadable store: {e}");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> ExpoResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)
            .map_err(|e| ExpoError::Serialization(e.to_string()))?;

        let temp = self.path.with_extension("json.tmp");
        std::fs::write(&temp, content)
            .map_err(|e| ExpoError::Store(format!("Could not write {}: {e}", temp.display())))?;
        std::fs::rename(&temp, &self.path).map_err(|e| {
            ExpoError::Store(format!("Could not replace {}: {e}", self.path.display()))
        })?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get_many(&self, keys: &[&str]) -> ExpoResult<Vec<Option<String>>> {
        let mut values = self.read_all()?;
        Ok(keys.iter().map(|key| values.remove(*key)).collect())
    }

    fn apply(&self, ops: &[StoreOp]) -> ExpoResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut values = self.read_all()?;
        for op in ops {
            op.apply_to(&mut values);
        }
        self.write_all(&values)?;

        debug!(path = %self.path.display(), ops = ops.len(), "Store updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn Store) {
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store
            .apply(&[StoreOp::put("b", "2"), StoreOp::put("c", "3")])
            .unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));

        store
            .apply(&[StoreOp::delete("b"), StoreOp::put("c", "30")])
            .unwrap();
        assert_eq!(store.get("b").unwrap(), None);
        assert_eq!(store.get("c").unwrap().as_deref(), Some("30"));

        store.remove("a").unwrap();
        store.remove("missing").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }

    #[test]
    fn memory_store_operations() {
        let store = MemoryStore::new();
        exercise(&store);
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn file_store_operations() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(&dir.path().join("nested"));
        exercise(&store);
        assert!(store.path().exists());
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::in_dir(dir.path()).set("key", "value").unwrap();

        let reopened = FileStore::in_dir(dir.path());
        assert_eq!(reopened.get("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn get_many_reads_keys_in_order() {
        let store = MemoryStore::new();
        store
            .apply(&[StoreOp::put("a", "1"), StoreOp::put("c", "3")])
            .unwrap();

        assert_eq!(
            store.get_many(&["c", "b", "a"]).unwrap(),
            vec![Some("3".to_string()), None, Some("1".to_string())]
        );
    }

    #[test]
    fn unreadable_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, "{\"lanka_expo_events\": \"[]\", \"lanka_expo_timest").unwrap();

        let store = FileStore::at(path);
        assert_eq!(store.get("lanka_expo_events").unwrap(), None);
        assert_eq!(store.get_many(&["a", "b"]).unwrap(), vec![None, None]);
    }

    #[test]
    fn unreadable_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STORE_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::at(path.clone());
        store.set("key", "value").unwrap();

        let reopened = FileStore::at(path);
        assert_eq!(reopened.get("key").unwrap().as_deref(), Some("value"));
        store.remove("key").unwrap();
        assert_eq!(reopened.get("key").unwrap(), None);
    }
}
